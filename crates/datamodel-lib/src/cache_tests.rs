use std::sync::Arc;

use datamodel_core::{HostTypeId, TypeRegistry};
use indoc::indoc;

use crate::Error;
use crate::cache::{CacheConfig, DataTypeCache};
use crate::diagnostics::{DiagnosticKind, ErrorCategory};
use crate::test_utils::{registry, ty};

const DECLS: &str = indoc! {r#"
    { "types": [
        { "kind": "class", "name": "Person",
          "members": [
            { "name": "Name", "type": "string", "mapping": "name" },
            { "name": "Age", "type": "int", "mapping": "age" }
          ] },
        { "kind": "class", "name": "Bar",
          "members": [{ "name": "Foos", "type": "Foo[]", "mapping": "foos" }] },
        { "kind": "class", "name": "Foo",
          "members": [{ "name": "Bar", "type": "Bar", "mapping": "bar" }] },
        { "kind": "class", "name": "Broken",
          "members": [{ "name": "Value", "type": "int" }] }
    ] }
"#};

fn setup(config: CacheConfig, names: &[&str]) -> (DataTypeCache, Vec<HostTypeId>) {
    let mut registry: TypeRegistry = registry(DECLS);
    let ids = names.iter().map(|name| ty(&mut registry, name)).collect();
    (DataTypeCache::with_config(Arc::new(registry), config), ids)
}

#[test]
fn repeated_lookups_share_the_published_graph() {
    let (cache, ids) = setup(CacheConfig::default(), &["Person"]);

    let first = cache.get_or_classify(ids[0], false).unwrap();
    let second = cache.get_or_classify(ids[0], false).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);
}

#[test]
fn cycle_policy_is_part_of_the_key() {
    let (cache, ids) = setup(CacheConfig::default(), &["Person", "Bar"]);

    let strict = cache.get_or_classify(ids[0], false).unwrap();
    let lenient = cache.get_or_classify(ids[0], true).unwrap();
    assert!(!Arc::ptr_eq(&strict, &lenient));

    assert!(cache.is_data_type(ids[1], true));
    assert!(!cache.is_data_type(ids[1], false));
    assert_eq!(cache.len(), 4);
}

#[test]
fn failures_are_published_too() {
    let (cache, ids) = setup(CacheConfig::default(), &["Bar"]);

    let first = cache.get_or_classify(ids[0], false).unwrap_err();
    let second = cache.get_or_classify(ids[0], false).unwrap_err();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.kinds(), vec![DiagnosticKind::CycleDetected]);

    let (ok, report) = cache.try_check(ids[0], false);
    assert!(!ok);
    assert!(Arc::ptr_eq(&report, &first));
}

#[test]
fn successful_checks_share_an_empty_report() {
    let (cache, ids) = setup(CacheConfig::default(), &["Person", "Bar"]);

    let (ok, a) = cache.try_check(ids[0], false);
    assert!(ok);
    assert!(a.is_empty());
    let (ok, b) = cache.try_check(ids[1], true);
    assert!(ok);
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn full_cache_stops_publishing() {
    let (cache, ids) = setup(CacheConfig::with_capacity(1), &["Person", "int[]"]);
    assert_eq!(cache.config().capacity, Some(1));

    let person = cache.get_or_classify(ids[0], true).unwrap();
    let a = cache.get_or_classify(ids[1], true).unwrap();
    let b = cache.get_or_classify(ids[1], true).unwrap();

    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(a.render(cache.registry()), b.render(cache.registry()));
    assert_eq!(cache.len(), 1);
    assert!(Arc::ptr_eq(
        &person,
        &cache.get_or_classify(ids[0], true).unwrap()
    ));
}

#[test]
fn throwing_entry_points() {
    let (cache, ids) = setup(CacheConfig::unbounded(), &["Person", "int*", "Broken", "Bar"]);

    assert!(cache.classify(ids[0], false).is_ok());
    assert!(cache.check(ids[0], false).is_ok());

    let err = cache.classify(ids[1], false).unwrap_err();
    assert!(matches!(err, Error::UnsupportedType(_)));
    assert_eq!(err.category(), Some(ErrorCategory::Unsupported));

    let err = cache.classify(ids[2], false).unwrap_err();
    let Error::UnsupportedType(unmapped) = err else {
        panic!("unmapped types are unsupported");
    };
    assert_eq!(unmapped.kind, DiagnosticKind::UnmappedType);

    let err = cache.classify(ids[3], false).unwrap_err();
    assert_eq!(err.category(), Some(ErrorCategory::InvalidDeclaration));

    let Err(Error::CheckFailed(report)) = cache.check(ids[3], false) else {
        panic!("check reports the whole failure");
    };
    assert_eq!(report.len(), 1);
    assert!(cache.check(ids[3], true).is_ok());
}

#[test]
fn concurrent_lookups_agree() {
    let (cache, ids) = setup(CacheConfig::default(), &["Bar"]);
    let bar = ids[0];

    let graphs: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| cache.get_or_classify(bar, true).unwrap()))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect()
    });

    let published = cache.get_or_classify(bar, true).unwrap();
    for graph in &graphs {
        assert!(Arc::ptr_eq(graph, &published));
    }
    assert_eq!(cache.len(), 1);
}
