//! Variable containers.

use serde::{Deserialize, Serialize};
use tracing::trace;

use hhat_ir::{Literal, Value};
use hhat_types::{DataType, DataTypeKind, FullName, Member, TypeError};

use crate::error::{MemError, MemResult};

/// How a variable may be written after its first assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    /// Assigned once, at declaration.
    Constant,
    /// Assigned once.
    #[default]
    Immutable,
    /// Reassignable.
    Mutable,
    /// Reassignable and extendable.
    Appendable,
}

impl VariableKind {
    pub fn allows_reassign(self) -> bool {
        matches!(self, VariableKind::Mutable | VariableKind::Appendable)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Slot {
    name: Option<String>,
    type_name: Option<FullName>,
}

/// A typed variable holding literal values laid out after its data type.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: FullName,
    type_name: FullName,
    type_kind: DataTypeKind,
    kind: VariableKind,
    slots: Vec<Slot>,
    data: Vec<(Option<String>, Literal)>,
    assigned: bool,
}

impl Variable {
    /// Create an unassigned variable of type `ty`.
    ///
    /// The variable name and the type must belong to the same paradigm.
    pub fn new(name: impl Into<FullName>, ty: &DataType, kind: VariableKind) -> MemResult<Self> {
        let name = name.into();
        if name.is_quantum() != ty.is_quantum() {
            return Err(MemError::VariableCreation {
                var: name,
                type_name: ty.name().clone(),
                reason: "variable and type belong to different paradigms".to_string(),
            });
        }

        let slots = if ty.members().is_empty() {
            vec![Slot {
                name: None,
                type_name: Some(ty.name().clone()),
            }]
        } else {
            ty.members()
                .iter()
                .map(|m| match m {
                    Member::Single { member_type } => Slot {
                        name: None,
                        type_name: Some(member_type.clone()),
                    },
                    Member::Typed { name, member_type } => Slot {
                        name: Some(name.clone()),
                        type_name: Some(member_type.clone()),
                    },
                    Member::Variant { tag, payload } => Slot {
                        name: Some(tag.clone()),
                        type_name: payload.clone(),
                    },
                })
                .collect()
        };

        Ok(Self {
            name,
            type_name: ty.name().clone(),
            type_kind: ty.kind(),
            kind,
            slots,
            data: Vec::new(),
            assigned: false,
        })
    }

    pub fn name(&self) -> &FullName {
        &self.name
    }

    pub fn type_name(&self) -> &FullName {
        &self.type_name
    }

    pub fn kind(&self) -> VariableKind {
        self.kind
    }

    pub fn is_quantum(&self) -> bool {
        self.name.is_quantum()
    }

    pub fn is_assigned(&self) -> bool {
        self.assigned
    }

    /// Assign values in member order.
    ///
    /// Single and struct variables take one value per member. Union variables
    /// take one value, stored under the first alternative of matching type.
    /// Enum variables take one `str` literal naming a payload-less tag.
    pub fn assign(&mut self, values: Vec<Literal>) -> MemResult<()> {
        self.check_writable()?;
        let data = match self.type_kind {
            DataTypeKind::Single | DataTypeKind::Struct => self.layout_positional(values)?,
            DataTypeKind::Union => {
                let value = self.exactly_one(values)?;
                let slot = self
                    .slots
                    .iter()
                    .find(|s| s.type_name.as_ref() == Some(value.type_name()))
                    .ok_or_else(|| {
                        self.mismatch(format!("no alternative of type '{}'", value.type_name()))
                    })?;
                vec![(slot.name.clone(), value)]
            }
            DataTypeKind::Enum => {
                let value = self.exactly_one(values)?;
                let tag = match value.as_core().map(|c| c.value()) {
                    Some(Value::Str(tag)) => tag.clone(),
                    _ => return Err(self.mismatch("expected a tag name".to_string())),
                };
                let slot = self
                    .slots
                    .iter()
                    .find(|s| s.name.as_deref() == Some(tag.as_str()))
                    .ok_or_else(|| self.mismatch(format!("unknown tag '{tag}'")))?;
                if slot.type_name.is_some() {
                    return Err(self.mismatch(format!("tag '{tag}' requires a payload")));
                }
                vec![(Some(tag), value)]
            }
        };
        self.store(data);
        Ok(())
    }

    /// Assign values by member name (or tag).
    pub fn assign_named(&mut self, values: Vec<(String, Literal)>) -> MemResult<()> {
        self.check_writable()?;
        let expected = match self.type_kind {
            DataTypeKind::Union | DataTypeKind::Enum => 1,
            DataTypeKind::Single | DataTypeKind::Struct => self.slots.len(),
        };
        if values.len() != expected {
            return Err(self.mismatch(format!(
                "expected {expected} values, got {}",
                values.len()
            )));
        }

        let mut data = Vec::with_capacity(values.len());
        for (member, value) in values {
            let slot = self
                .slots
                .iter()
                .find(|s| s.name.as_deref() == Some(member.as_str()))
                .ok_or_else(|| MemError::VariableWrongMember {
                    var: self.name.clone(),
                    member: member.clone(),
                })?;
            self.check_slot(slot, &value)?;
            if data.iter().any(|(m, _): &(Option<String>, Literal)| m.as_deref() == Some(member.as_str())) {
                return Err(self.mismatch(format!("member '{member}' assigned twice")));
            }
            data.push((Some(member), value));
        }

        // keep declaration order regardless of argument order
        data.sort_by_key(|(m, _)| {
            self.slots
                .iter()
                .position(|s| s.name == *m)
                .unwrap_or(usize::MAX)
        });
        self.store(data);
        Ok(())
    }

    /// Value of `member`, or the first stored value when `member` is `None`.
    pub fn get(&self, member: Option<&str>) -> MemResult<&Literal> {
        let found = match member {
            None => self.data.first(),
            Some(m) => self.data.iter().find(|(name, _)| name.as_deref() == Some(m)),
        };
        found.map(|(_, lit)| lit).ok_or_else(|| MemError::VariableWrongMember {
            var: self.name.clone(),
            member: member.unwrap_or("<first>").to_string(),
        })
    }

    /// Stored values in member order.
    pub fn values(&self) -> impl Iterator<Item = &Literal> {
        self.data.iter().map(|(_, lit)| lit)
    }

    fn check_writable(&self) -> MemResult<()> {
        if self.assigned && !self.kind.allows_reassign() {
            return Err(MemError::VariableImmutable(self.name.clone()));
        }
        Ok(())
    }

    fn layout_positional(&self, values: Vec<Literal>) -> MemResult<Vec<(Option<String>, Literal)>> {
        if values.len() != self.slots.len() {
            return Err(self.mismatch(format!(
                "expected {} values, got {}",
                self.slots.len(),
                values.len()
            )));
        }
        let mut data = Vec::with_capacity(values.len());
        for (slot, value) in self.slots.iter().zip(values) {
            self.check_slot(slot, &value)?;
            data.push((slot.name.clone(), value));
        }
        Ok(data)
    }

    fn check_slot(&self, slot: &Slot, value: &Literal) -> MemResult<()> {
        match &slot.type_name {
            Some(expected) if expected == value.type_name() => Ok(()),
            Some(expected) => Err(self.mismatch(format!(
                "member '{}' expects '{}', got '{}'",
                slot.name.as_deref().unwrap_or("_"),
                expected,
                value.type_name()
            ))),
            None => Err(self.mismatch(format!(
                "tag '{}' carries no payload",
                slot.name.as_deref().unwrap_or("_")
            ))),
        }
    }

    fn exactly_one(&self, mut values: Vec<Literal>) -> MemResult<Literal> {
        match (values.pop(), values.is_empty()) {
            (Some(v), true) => Ok(v),
            _ => Err(self.mismatch("expected exactly one value".to_string())),
        }
    }

    fn store(&mut self, data: Vec<(Option<String>, Literal)>) {
        trace!("Assigning {} values to '{}'", data.len(), self.name);
        self.data = data;
        self.assigned = true;
    }

    fn mismatch(&self, reason: String) -> MemError {
        MemError::Type(TypeError::AssignMismatch {
            kind: self.type_kind,
            type_name: self.type_name.clone(),
            reason,
        })
    }
}
