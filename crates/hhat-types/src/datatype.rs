//! Data type declarations: single, struct, union and enum.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

use crate::error::{TypeError, TypeResult};
use crate::name::{FullName, is_quantum_name};
use crate::size::{QSize, Size};

/// The four kinds of data type containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataTypeKind {
    /// Wraps exactly one member type.
    Single,
    /// Ordered, distinct, named members.
    Struct,
    /// Named alternatives.
    Union,
    /// Tags, each optionally carrying a single or struct payload.
    Enum,
}

impl DataTypeKind {
    /// The member kind a container of this kind accepts.
    pub fn supported_member(self) -> MemberKind {
        match self {
            DataTypeKind::Single => MemberKind::Single,
            DataTypeKind::Struct | DataTypeKind::Union => MemberKind::Typed,
            DataTypeKind::Enum => MemberKind::Variant,
        }
    }
}

impl fmt::Display for DataTypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataTypeKind::Single => write!(f, "single"),
            DataTypeKind::Struct => write!(f, "struct"),
            DataTypeKind::Union => write!(f, "union"),
            DataTypeKind::Enum => write!(f, "enum"),
        }
    }
}

/// Discriminant of [`Member`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberKind {
    Single,
    Typed,
    Variant,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberKind::Single => write!(f, "single"),
            MemberKind::Typed => write!(f, "named"),
            MemberKind::Variant => write!(f, "variant"),
        }
    }
}

/// A member of a data type container.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Member {
    /// The wrapped type of a single type.
    Single { member_type: FullName },
    /// A named member of a struct or a named alternative of a union.
    Typed { name: String, member_type: FullName },
    /// An enum tag with an optional payload type.
    Variant {
        tag: String,
        payload: Option<FullName>,
    },
}

impl Member {
    pub fn single(member_type: impl Into<FullName>) -> Self {
        Member::Single {
            member_type: member_type.into(),
        }
    }

    pub fn typed(name: impl Into<String>, member_type: impl Into<FullName>) -> Self {
        Member::Typed {
            name: name.into(),
            member_type: member_type.into(),
        }
    }

    pub fn variant(tag: impl Into<String>, payload: Option<FullName>) -> Self {
        Member::Variant {
            tag: tag.into(),
            payload,
        }
    }

    pub fn kind(&self) -> MemberKind {
        match self {
            Member::Single { .. } => MemberKind::Single,
            Member::Typed { .. } => MemberKind::Typed,
            Member::Variant { .. } => MemberKind::Variant,
        }
    }

    /// Member name or enum tag. Single members are unnamed.
    pub fn name(&self) -> Option<&str> {
        match self {
            Member::Single { .. } => None,
            Member::Typed { name, .. } => Some(name),
            Member::Variant { tag, .. } => Some(tag),
        }
    }

    /// The type this member refers to, if any.
    pub fn member_type(&self) -> Option<&FullName> {
        match self {
            Member::Single { member_type } | Member::Typed { member_type, .. } => Some(member_type),
            Member::Variant { payload, .. } => payload.as_ref(),
        }
    }
}

/// A declared data type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataType {
    name: FullName,
    kind: DataTypeKind,
    members: Vec<Member>,
    size: Size,
    qsize: Option<QSize>,
    is_builtin: bool,
}

impl DataType {
    /// Declare an empty, user-defined type.
    pub fn new(name: impl Into<FullName>, kind: DataTypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            members: Vec::new(),
            size: Size::unset(),
            qsize: None,
            is_builtin: false,
        }
    }

    /// Declare a builtin type with fixed sizes. Builtins never recompute.
    pub fn builtin(name: impl Into<FullName>, size: Size, qsize: QSize) -> Self {
        Self {
            name: name.into(),
            kind: DataTypeKind::Single,
            members: Vec::new(),
            size,
            qsize: Some(qsize),
            is_builtin: true,
        }
    }

    pub fn name(&self) -> &FullName {
        &self.name
    }

    pub fn kind(&self) -> DataTypeKind {
        self.kind
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn is_builtin(&self) -> bool {
        self.is_builtin
    }

    pub fn is_quantum(&self) -> bool {
        self.name.is_quantum()
    }

    /// The recorded classical size (unset until resolved for composites).
    pub fn size(&self) -> Size {
        self.size
    }

    /// The memoized quantum size, if already resolved.
    pub fn qsize(&self) -> Option<QSize> {
        self.qsize
    }

    /// Look up a member by name or tag.
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name() == Some(name))
    }

    /// Position of a named member.
    pub fn member_index(&self, name: &str) -> Option<usize> {
        self.members.iter().position(|m| m.name() == Some(name))
    }

    /// Add a member, validating it against the container.
    pub fn add_member(&mut self, member: Member) -> TypeResult<&mut Self> {
        self.check_member(&member)?;
        trace!("Adding member {:?} to '{}'", member, self.name);
        self.members.push(member);
        Ok(self)
    }

    /// Builder form of [`DataType::add_member`].
    pub fn with_member(mut self, member: Member) -> TypeResult<Self> {
        self.add_member(member)?;
        Ok(self)
    }

    fn check_member(&self, member: &Member) -> TypeResult<()> {
        if self.is_builtin {
            return Err(TypeError::BuiltinImmutable(self.name.clone()));
        }

        let expected = self.kind.supported_member();
        if member.kind() != expected {
            return Err(TypeError::MemberKindMismatch {
                container: self.name.clone(),
                expected,
                found: member.kind(),
            });
        }

        if self.kind == DataTypeKind::Single && !self.members.is_empty() {
            return Err(TypeError::SingleAlreadyAssigned(self.name.clone()));
        }

        if let Some(name) = member.name() {
            if self.member(name).is_some() {
                return Err(TypeError::DuplicateMember {
                    container: self.name.clone(),
                    member: name.to_string(),
                });
            }
        }

        if let Some(member_type) = member.member_type() {
            if member_type.is_quantum() && !self.is_quantum() {
                return Err(TypeError::QuantumOnClassical {
                    container: self.name.clone(),
                    member_type: member_type.clone(),
                });
            }

            if let (DataTypeKind::Struct, Member::Typed { name, .. }) = (self.kind, member) {
                if is_quantum_name(name) != member_type.is_quantum() {
                    return Err(TypeError::MemberParadigmMismatch {
                        container: self.name.clone(),
                        member: name.clone(),
                        member_type: member_type.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    pub(crate) fn record_qsize(&mut self, qsize: QSize) {
        self.qsize = Some(qsize);
    }

    pub(crate) fn record_size(&mut self, bits: u32) -> TypeResult<u32> {
        self.size.add_size(bits)
    }
}
