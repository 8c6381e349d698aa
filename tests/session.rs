//! Integration tests for writer/reader sessions.
//!
//! These tests drive two type tables the way a serializer and a deserializer would: the
//! writer issues a handle for every type-bearing slot it writes, the reader resolves every
//! handle it reads, and at the end both tables must agree entry by entry.

use dotwire::{prelude::*, wire::CANONICAL_CORE_LIBRARY, Result};
use std::sync::Arc;

fn app_assembly() -> AssemblyIdentity {
    AssemblyIdentity::new("Shop.Model", AssemblyVersion::new(2, 1, 0, 0), None, None, None)
}

/// Catalog with a small application model registered on top of the built-in types.
fn shop_catalog() -> Result<Arc<TypeCatalog>> {
    let catalog = Arc::new(TypeCatalog::default());

    let order = TypeBuilder::new(catalog.clone())
        .name("Shop.Model", "Order")
        .assembly(app_assembly())
        .build()?;
    TypeBuilder::new(catalog.clone())
        .name("", "Status")
        .nested_in(&order)
        .enum_type()
        .build()?;
    TypeBuilder::new(catalog.clone())
        .name("Shop.Model", "Line")
        .assembly(app_assembly())
        .value_type()
        .build()?;
    TypeBuilder::new(catalog.clone())
        .name("Shop.Model", "Page")
        .assembly(app_assembly())
        .generic_arity(1)
        .build()?;

    Ok(catalog)
}

/// Types in the order a serializer would encounter them, with repetitions.
fn object_graph(catalog: &TypeCatalog) -> Result<Vec<TypeRc>> {
    [
        "Shop.Model.Page`1[[Shop.Model.Order, Shop.Model]], Shop.Model",
        "Shop.Model.Order, Shop.Model",
        "System.Guid",
        "Shop.Model.Order+Status, Shop.Model",
        "System.Collections.Generic.List`1[[Shop.Model.Line, Shop.Model]]",
        "Shop.Model.Line, Shop.Model",
        "System.Decimal, mscorlib",
        "System.Byte[]",
        "Shop.Model.Order, Shop.Model",
        "Shop.Model.Line, Shop.Model",
        "System.Decimal, mscorlib",
        "System.Object",
        "Shop.Model.Order+Status[], Shop.Model",
    ]
    .iter()
    .map(|name| catalog.resolve(name))
    .collect()
}

fn run_session(own_framework: bool) -> Result<(TypeTable, TypeTable, Vec<TypeHandle>)> {
    let catalog = shop_catalog()?;
    let mut writer = TypeTable::with_config(catalog.clone(), WireConfig::isolated())?;
    let mut reader = TypeTable::with_config(catalog.clone(), WireConfig::isolated())?;

    let mut stream = Vec::new();
    for runtime_type in object_graph(&catalog)? {
        let handle = writer.issue_handle(&runtime_type, own_framework)?;

        // Handles cross the wire in their text form
        let received = TypeHandle::from(handle.to_text());
        let decoded = reader.resolve_handle(&received)?;
        assert!(
            Arc::ptr_eq(&decoded, &runtime_type),
            "{} decoded as {}",
            runtime_type,
            decoded
        );

        stream.push(handle);
    }

    Ok((writer, reader, stream))
}

#[test]
fn test_tables_converge() -> Result<()> {
    let (writer, reader, _) = run_session(true)?;

    assert_eq!(writer.count(), reader.count());
    assert_eq!(writer.checksum(), reader.checksum());
    for (index, (ours, theirs)) in writer.iter().zip(reader.iter()).enumerate() {
        assert!(Arc::ptr_eq(ours, theirs), "entry {} differs", index);
    }

    reader.ensure_compatible(&TableSummary::from_bytes(&writer.summary().to_bytes())?)?;
    Ok(())
}

#[test]
fn test_raw_names_converge() -> Result<()> {
    let (writer, reader, stream) = run_session(false)?;

    assert_eq!(writer.summary(), reader.summary());
    let corelib_names = stream
        .iter()
        .filter_map(|handle| match handle {
            TypeHandle::Name(name) => Some(name),
            TypeHandle::Index(_) => None,
        })
        .filter(|name| name.contains("System.Private.CoreLib"))
        .count();
    assert!(corelib_names > 0);
    Ok(())
}

#[test]
fn test_first_occurrence_is_named_later_are_indexed() -> Result<()> {
    let (_, _, stream) = run_session(true)?;

    // Order, Line and Decimal repeat; Byte[] and Object are reserved
    let indices: Vec<String> = stream
        .iter()
        .filter(|handle| matches!(handle, TypeHandle::Index(_)))
        .map(TypeHandle::to_text)
        .collect();
    assert_eq!(indices, vec!["$3", "$5", "$9", "$10", "$1"]);

    let names = stream
        .iter()
        .filter(|handle| matches!(handle, TypeHandle::Name(_)))
        .count();
    assert_eq!(names, 8);
    Ok(())
}

#[test]
fn test_own_framework_names_are_runtime_independent() -> Result<()> {
    let modern = Arc::new(TypeCatalog::new(AssemblyIdentity::private_corelib()));
    let legacy = Arc::new(TypeCatalog::new(AssemblyIdentity::mscorlib()));

    let name = "System.Collections.Generic.Dictionary`2[[System.String, mscorlib],[System.Int32, mscorlib]]";
    let mut modern_table = TypeTable::with_config(modern.clone(), WireConfig::isolated())?;
    let mut legacy_table = TypeTable::with_config(legacy.clone(), WireConfig::isolated())?;

    let from_modern = modern_table.issue_handle(&modern.resolve(name)?, true)?;
    let from_legacy = legacy_table.issue_handle(&legacy.resolve(name)?, true)?;
    assert_eq!(from_modern, from_legacy);
    assert!(from_modern.to_text().contains(CANONICAL_CORE_LIBRARY));
    assert!(!from_modern.to_text().contains("System.Private.CoreLib"));

    // A legacy reader understands a modern writer's raw names too
    let raw = modern_table.issue_handle(&modern.resolve("System.TimeSpan")?, false)?;
    assert!(raw.to_text().contains("System.Private.CoreLib"));
    let decoded = legacy_table.resolve_handle(&raw)?;
    assert_eq!(decoded.full_name(), "System.TimeSpan");
    assert_eq!(decoded.assembly.name, "mscorlib");
    Ok(())
}

#[test]
fn test_diverged_tables_are_detected() -> Result<()> {
    let catalog = shop_catalog()?;
    let mut writer = TypeTable::with_config(catalog.clone(), WireConfig::isolated())?;
    let mut reader = TypeTable::with_config(catalog.clone(), WireConfig::isolated())?;

    // The reader misses the writer's first name handle
    let guid = catalog.well_known(WellKnownType::Guid)?;
    writer.issue_handle(&guid, true)?;
    let second = writer.issue_handle(&guid, true)?;

    assert!(matches!(
        reader.ensure_compatible(&writer.summary()),
        Err(Error::ChecksumMismatch { .. })
    ));
    match reader.resolve_handle(&second) {
        Err(Error::InvalidHandle {
            handle,
            reason: HandleError::UnknownHandle { index: 4, count: 4 },
        }) => assert_eq!(handle, "$4"),
        other => panic!("expected UnknownHandle, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_fresh_tables_agree_everywhere() -> Result<()> {
    let first = TypeTable::with_config(Arc::new(TypeCatalog::default()), WireConfig::isolated())?;
    let second = TypeTable::with_config(
        Arc::new(TypeCatalog::new(AssemblyIdentity::mscorlib())),
        WireConfig::isolated(),
    )?;

    assert_eq!(first.count(), 4);
    assert_eq!(first.summary(), second.summary());
    for slot in [
        ReservedSlot::NullPlaceholder,
        ReservedSlot::Object,
        ReservedSlot::ObjectArray,
        ReservedSlot::ByteArray,
    ] {
        assert_eq!(first.get(slot.index()), second.get(slot.index()));
    }
    Ok(())
}
