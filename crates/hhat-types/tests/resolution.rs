//! Cross-module tests for type resolution.

use hhat_types::{DataType, DataTypeKind, FullName, Member, NameSpace, QSize, Size, TypeError, TypeTable};

fn declare(table: &mut TypeTable, name: &str, kind: DataTypeKind, members: Vec<Member>) {
    let mut ty = DataType::new(name, kind);
    for m in members {
        ty.add_member(m).unwrap();
    }
    table.add(ty).unwrap();
}

#[test]
fn test_transitive_cycle_fails_resolution() {
    let mut table = TypeTable::with_builtins();
    declare(&mut table, "@a", DataTypeKind::Struct, vec![Member::typed("@x", "@b")]);
    declare(&mut table, "@b", DataTypeKind::Single, vec![Member::single("@c")]);
    declare(&mut table, "@c", DataTypeKind::Struct, vec![Member::typed("@y", "@a")]);

    for name in ["@a", "@b", "@c"] {
        let name = FullName::local(name);
        assert!(matches!(
            table.resolve_qsize(&name),
            Err(TypeError::DefinitionCycle { .. })
        ));
        assert!(matches!(
            table.resolve_size(&name),
            Err(TypeError::DefinitionCycle { .. })
        ));
    }
    assert!(table.detect_cycles().is_err());
    assert!(table.resolve_all().is_err());
}

#[test]
fn test_nested_quantum_composition() {
    let mut table = TypeTable::with_builtins();
    declare(&mut table, "@qb", DataTypeKind::Single, vec![Member::single("@bool")]);
    declare(
        &mut table,
        "@pair",
        DataTypeKind::Struct,
        vec![Member::typed("@a", "@qb"), Member::typed("@b", "@qb")],
    );
    declare(
        &mut table,
        "@reg",
        DataTypeKind::Struct,
        vec![Member::typed("@lo", "@pair"), Member::typed("@hi", "@u4")],
    );

    table.resolve_all().unwrap();
    let reg = table.get(&FullName::local("@reg")).unwrap();
    assert_eq!(reg.qsize(), Some(QSize::fixed(6)));
    assert_eq!(reg.size(), Size::fixed(6));
}

#[test]
fn test_namespaced_types_are_distinct() {
    let mut table = TypeTable::with_builtins();
    let a = FullName::new(NameSpace::new(["geo"]), "point");
    let b = FullName::new(NameSpace::new(["gfx"]), "point");

    table
        .add(
            DataType::new(a.clone(), DataTypeKind::Struct)
                .with_member(Member::typed("x", "u8"))
                .unwrap(),
        )
        .unwrap();
    table
        .add(
            DataType::new(b.clone(), DataTypeKind::Struct)
                .with_member(Member::typed("x", "u64"))
                .unwrap(),
        )
        .unwrap();

    assert_eq!(table.resolve_size(&a), Ok(Size::fixed(8)));
    assert_eq!(table.resolve_size(&b), Ok(Size::fixed(64)));
}

#[test]
fn test_union_sums_alternatives() {
    let mut table = TypeTable::with_builtins();
    declare(
        &mut table,
        "number",
        DataTypeKind::Union,
        vec![Member::typed("small", "u8"), Member::typed("big", "u64")],
    );
    assert_eq!(
        table.resolve_size(&FullName::local("number")),
        Ok(Size::fixed(72))
    );
}

mod props {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn size_is_write_once(first in 0u32..1024, second in 0u32..1024) {
            let mut size = Size::unset();
            prop_assert_eq!(size.add_size(first), Ok(first));
            prop_assert!(size.add_size(second).is_err());
            prop_assert_eq!(size.bits(), Some(first));
        }

        #[test]
        fn struct_qsize_is_sum_of_members(widths in prop::collection::vec(1u32..=4, 1..6)) {
            let mut table = TypeTable::with_builtins();
            let mut ty = DataType::new("@s", DataTypeKind::Struct);
            for (i, w) in widths.iter().enumerate() {
                let member_type = if *w == 1 { "@bool".to_string() } else { format!("@u{w}") };
                ty.add_member(Member::typed(format!("@m{i}"), member_type.as_str())).unwrap();
            }
            table.add(ty).unwrap();

            let total: u32 = widths.iter().sum();
            prop_assert_eq!(table.resolve_qsize(&FullName::local("@s")), Ok(QSize::fixed(total)));
        }
    }
}
