use super::*;

fn tree(name: &str) -> JsNode {
    JsNode::id(name)
}

#[test]
fn test_one_time_cache_fills_once() {
    let mut cache = OneTimeCache::default();
    let first = cache.get_or_else_update(|| tree("a")).clone();
    let second = cache.get_or_else_update(|| tree("b")).clone();
    assert_eq!(first, tree("a"));
    assert_eq!(second, tree("a"));
}

#[test]
fn test_one_time_cache_invalidate_resets() {
    let mut cache = OneTimeCache::default();
    cache.get_or_else_update(|| tree("a"));
    cache.invalidate();
    let value = cache.get_or_else_update(|| tree("b")).clone();
    assert_eq!(value, tree("b"));
}

#[test]
fn test_one_time_cache_error_leaves_slot_empty() {
    let mut cache = OneTimeCache::default();
    let result: Result<&JsNode, &str> = cache.try_get_or_else_update(|| Err("boom"));
    assert!(result.is_err());
    let value: Result<JsNode, &str> = cache
        .try_get_or_else_update(|| Ok(tree("ok")))
        .map(Clone::clone);
    assert_eq!(value, Ok(tree("ok")));
}

#[test]
fn test_method_cache_version_gating() {
    let mut cache = MethodCache::default();
    let mut stats = CacheStats::default();

    let v1 = cache
        .get_or_else_update(Some("v1"), || tree("a"), &mut stats)
        .clone();
    assert_eq!(v1, tree("a"));
    assert_eq!(stats.methods_invalidated, 1);

    // Same version: reused, producer not run.
    let again = cache
        .get_or_else_update(Some("v1"), || tree("b"), &mut stats)
        .clone();
    assert_eq!(again, tree("a"));
    assert_eq!(stats.methods_reused, 1);

    // Different version: rebuilt.
    let v2 = cache
        .get_or_else_update(Some("v2"), || tree("c"), &mut stats)
        .clone();
    assert_eq!(v2, tree("c"));
    assert_eq!(stats.methods_invalidated, 2);
}

#[test]
fn test_method_cache_none_version_never_matches() {
    let mut cache = MethodCache::default();
    let mut stats = CacheStats::default();
    cache.get_or_else_update(None, || tree("a"), &mut stats);
    cache.get_or_else_update(None, || tree("b"), &mut stats);
    assert_eq!(stats.methods_reused, 0);
    assert_eq!(stats.methods_invalidated, 2);
}

#[test]
fn test_method_cache_invalidate_forces_rebuild() {
    let mut cache = MethodCache::default();
    let mut stats = CacheStats::default();
    cache.get_or_else_update(Some("v"), || tree("a"), &mut stats);
    cache.invalidate();
    let rebuilt = cache
        .get_or_else_update(Some("v"), || tree("b"), &mut stats)
        .clone();
    assert_eq!(rebuilt, tree("b"));
}

#[test]
fn test_class_cache_version_protocol() {
    let mut cache = ClassCache::default();
    let mut stats = CacheStats::default();

    cache.start_run();
    cache.get_cache(Some("v1"), &mut stats);
    assert_eq!(stats.classes_invalidated, 1);

    cache.start_run();
    cache.get_cache(Some("v1"), &mut stats);
    assert_eq!(stats.classes_reused, 1);

    cache.start_run();
    cache.get_cache(Some("v2"), &mut stats);
    assert_eq!(stats.classes_invalidated, 2);

    // None version never reuses.
    cache.start_run();
    cache.get_cache(None, &mut stats);
    cache.start_run();
    cache.get_cache(None, &mut stats);
    assert_eq!(stats.classes_invalidated, 4);
}

#[test]
fn test_class_cache_second_fetch_same_run_keeps_slots() {
    let mut cache = ClassCache::default();
    let mut stats = CacheStats::default();

    cache.start_run();
    let dcc = cache.get_cache(None, &mut stats);
    dcc.type_data.get_or_else_update(|| tree("data"));

    // A repeat fetch within the same run must keep the slots, even for
    // a None version.
    let dcc = cache.get_cache(None, &mut stats);
    let kept = dcc.type_data.get_or_else_update(|| tree("other")).clone();
    assert_eq!(kept, tree("data"));
    assert_eq!(stats.classes_invalidated, 1);
}

#[test]
fn test_class_cache_version_change_drops_one_time_slots() {
    let mut cache = ClassCache::default();
    let mut stats = CacheStats::default();

    cache.start_run();
    let dcc = cache.get_cache(Some("v1"), &mut stats);
    dcc.constructor.get_or_else_update(|| tree("ctor1"));

    cache.start_run();
    let dcc = cache.get_cache(Some("v2"), &mut stats);
    let rebuilt = dcc.constructor.get_or_else_update(|| tree("ctor2")).clone();
    assert_eq!(rebuilt, tree("ctor2"));
}

#[test]
fn test_class_cache_retention() {
    let mut cache = ClassCache::default();
    let mut stats = CacheStats::default();

    // Used class cache survives.
    cache.start_run();
    cache.get_cache(Some("v"), &mut stats);
    assert!(cache.clean_after_run());

    // Unused class cache with an unused method cache dies.
    cache.start_run();
    assert!(!cache.clean_after_run());
}

#[test]
fn test_method_cache_retention_keeps_used_methods() {
    let mut cache = ClassCache::default();
    let mut stats = CacheStats::default();

    cache.start_run();
    cache
        .method_cache("m__I")
        .get_or_else_update(Some("v"), || tree("a"), &mut stats);
    assert!(cache.clean_after_run());

    // Next run: method not touched, class cache not touched: dropped.
    cache.start_run();
    assert!(!cache.clean_after_run());
}

#[test]
fn test_invalidate_method_routes_static_separately() {
    let mut cache = ClassCache::default();
    let mut stats = CacheStats::default();

    cache
        .method_cache("m__I")
        .get_or_else_update(Some("v"), || tree("member"), &mut stats);
    cache
        .static_method_cache("m__I")
        .get_or_else_update(Some("v"), || tree("static"), &mut stats);

    cache.invalidate_method("m__I", true);

    let member = cache
        .method_cache("m__I")
        .get_or_else_update(Some("v"), || tree("member2"), &mut stats)
        .clone();
    assert_eq!(member, tree("member"), "member cache untouched");

    let stat = cache
        .static_method_cache("m__I")
        .get_or_else_update(Some("v"), || tree("static2"), &mut stats)
        .clone();
    assert_eq!(stat, tree("static2"), "static cache rebuilt");
}

#[test]
fn test_invalidate_exported_members_resets_slots() {
    let mut cache = ClassCache::default();
    let mut stats = CacheStats::default();

    let dcc = cache.get_cache(Some("v"), &mut stats);
    dcc.exported_members.get_or_else_update(|| tree("exports1"));
    dcc.class_exports.get_or_else_update(|| tree("cexports1"));

    cache.invalidate_exported_members();

    let dcc = cache.get_cache(Some("v"), &mut stats);
    let exported = dcc.exported_members.get_or_else_update(|| tree("exports2")).clone();
    assert_eq!(exported, tree("exports2"));
}
