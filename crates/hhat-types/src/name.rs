//! Canonical names for types, variables and functions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Leading character that marks a name as belonging to the quantum paradigm.
pub const QUANTUM_SIGIL: char = '@';

/// Returns true when `name` carries the quantum sigil.
pub fn is_quantum_name(name: &str) -> bool {
    name.starts_with(QUANTUM_SIGIL)
}

/// An ordered path of namespace segments, e.g. `std.math`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NameSpace(Vec<String>);

impl NameSpace {
    /// Create a namespace from its segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// The empty namespace, used by builtins and local declarations.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Whether this is the empty namespace.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The namespace segments in order.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// A child namespace with `segment` appended.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }
}

impl fmt::Display for NameSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// A namespace together with a leaf name.
///
/// `FullName` is the key of every table in the core: type table, function
/// table and the index manager's in-use map. Two declarations are the same
/// exactly when both namespace and name agree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FullName {
    namespace: NameSpace,
    name: String,
}

impl FullName {
    /// Create a name inside `namespace`.
    pub fn new(namespace: NameSpace, name: impl Into<String>) -> Self {
        Self {
            namespace,
            name: name.into(),
        }
    }

    /// Create a name in the root namespace.
    pub fn local(name: impl Into<String>) -> Self {
        Self::new(NameSpace::root(), name)
    }

    /// The leaf name, sigil included.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The enclosing namespace.
    pub fn namespace(&self) -> &NameSpace {
        &self.namespace
    }

    /// Whether the leaf name carries the quantum sigil.
    pub fn is_quantum(&self) -> bool {
        is_quantum_name(&self.name)
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_root() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}.{}", self.namespace, self.name)
        }
    }
}

impl From<&str> for FullName {
    fn from(name: &str) -> Self {
        Self::local(name)
    }
}

impl From<String> for FullName {
    fn from(name: String) -> Self {
        Self::local(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_quantum_sigil() {
        assert!(FullName::local("@u3").is_quantum());
        assert!(!FullName::local("u3").is_quantum());
        assert!(FullName::new(NameSpace::new(["std", "q"]), "@bool").is_quantum());
    }

    #[test]
    fn test_display() {
        let ns = NameSpace::new(["std", "math"]);
        assert_eq!(ns.to_string(), "std.math");
        assert_eq!(FullName::new(ns, "sqrt").to_string(), "std.math.sqrt");
        assert_eq!(FullName::local("u8").to_string(), "u8");
    }

    #[test]
    fn test_namespace_distinguishes_names() {
        let a = FullName::new(NameSpace::new(["a"]), "x");
        let b = FullName::new(NameSpace::new(["b"]), "x");
        let a2 = FullName::new(NameSpace::root().child("a"), "x");

        let mut set = FxHashSet::default();
        set.insert(a.clone());
        set.insert(b);
        set.insert(a2.clone());

        assert_eq!(set.len(), 2);
        assert_eq!(a, a2);
    }
}
