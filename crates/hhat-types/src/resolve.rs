//! Recursive size resolution.
//!
//! Both resolvers walk member types depth first, carrying the current path.
//! Reaching a type already on the path is a [`TypeError::DefinitionCycle`].
//! Results are memoized on the table so each type is computed once.

use tracing::debug;

use crate::datatype::{DataTypeKind, Member};
use crate::error::{TypeError, TypeResult};
use crate::name::FullName;
use crate::size::{QSize, Size};
use crate::table::TypeTable;

/// Sum of the members' quantum sizes.
pub fn resolve_qsize(name: &FullName, table: &mut TypeTable) -> TypeResult<QSize> {
    let mut path = Vec::new();
    qsize_of(name, table, &mut path)
}

/// Sum of the members' classical sizes. Builtins report their fixed width.
pub fn resolve_size(name: &FullName, table: &mut TypeTable) -> TypeResult<Size> {
    let mut path = Vec::new();
    size_of(name, table, &mut path).map(Size::fixed)
}

fn qsize_of(name: &FullName, table: &mut TypeTable, path: &mut Vec<FullName>) -> TypeResult<QSize> {
    check_path(name, path)?;
    let ty = table
        .get(name)
        .ok_or_else(|| TypeError::UnknownType(name.clone()))?;
    if let Some(qsize) = ty.qsize() {
        return Ok(qsize);
    }

    let deps = dependencies(name, table)?;
    path.push(name.clone());
    let mut total = QSize::empty();
    for dep in &deps {
        total = total + qsize_of(dep, table, path)?;
    }
    path.pop();

    debug!("Resolved '{}' to {}", name, total);
    if let Some(ty) = table.get_mut(name) {
        ty.record_qsize(total);
    }
    Ok(total)
}

fn size_of(name: &FullName, table: &mut TypeTable, path: &mut Vec<FullName>) -> TypeResult<u32> {
    check_path(name, path)?;
    let ty = table
        .get(name)
        .ok_or_else(|| TypeError::UnknownType(name.clone()))?;
    if let Some(bits) = ty.size().bits() {
        return Ok(bits);
    }
    if ty.is_builtin() {
        return Err(TypeError::UnsizedType(name.clone()));
    }

    let deps = dependencies(name, table)?;
    path.push(name.clone());
    let mut total = 0u32;
    for dep in &deps {
        total += size_of(dep, table, path).map_err(|e| match e {
            TypeError::UnsizedType(_) => TypeError::UnsizedType(name.clone()),
            other => other,
        })?;
    }
    path.pop();

    debug!("Resolved '{}' to {} bits", name, total);
    match table.get_mut(name) {
        Some(ty) => ty.record_size(total),
        None => Ok(total),
    }
}

fn check_path(name: &FullName, path: &[FullName]) -> TypeResult<()> {
    match path.iter().position(|n| n == name) {
        Some(pos) => {
            let mut cycle = path[pos..].to_vec();
            cycle.push(name.clone());
            Err(TypeError::DefinitionCycle { path: cycle })
        }
        None => Ok(()),
    }
}

/// Member types of `name`, with enum payloads validated.
fn dependencies(name: &FullName, table: &TypeTable) -> TypeResult<Vec<FullName>> {
    let ty = table
        .get(name)
        .ok_or_else(|| TypeError::UnknownType(name.clone()))?;

    let mut deps = Vec::with_capacity(ty.members().len());
    for member in ty.members() {
        if let Member::Variant {
            tag,
            payload: Some(payload),
        } = member
        {
            let payload_ty = table
                .get(payload)
                .ok_or_else(|| TypeError::UnknownType(payload.clone()))?;
            if !matches!(payload_ty.kind(), DataTypeKind::Single | DataTypeKind::Struct) {
                return Err(TypeError::InvalidEnumPayload {
                    enum_name: name.clone(),
                    tag: tag.clone(),
                    payload: payload.clone(),
                });
            }
        }
        if let Some(member_type) = member.member_type() {
            deps.push(member_type.clone());
        }
    }
    Ok(deps)
}
