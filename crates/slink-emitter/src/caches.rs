//! Two-level incremental tree cache.
//!
//! A `ClassCache` lives as long as its class keeps the same ancestor
//! list. Inside it, a `DesugaredClassCache` holds the one-shot per-class
//! pieces for the last-seen class version, and one `MethodCache` per
//! method memoizes desugared bodies keyed by method version.
//!
//! Retention is usage-driven: `start_run` clears the used flags,
//! `clean_after_run` drops everything that went unused for a whole run.

use rustc_hash::FxHashMap;

use crate::javascript::JsNode;

/// Run statistics, reported at the end of every `emit`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub classes_reused: u32,
    pub classes_invalidated: u32,
    pub methods_reused: u32,
    pub methods_invalidated: u32,
}

static SKIP: JsNode = JsNode::Skip;

/// A slot filled at most once per `DesugaredClassCache` lifetime.
#[derive(Default)]
pub struct OneTimeCache {
    value: Option<JsNode>,
}

impl OneTimeCache {
    pub fn get_or_else_update(&mut self, producer: impl FnOnce() -> JsNode) -> &JsNode {
        self.value.get_or_insert_with(producer)
    }

    /// Fallible variant; an error leaves the slot empty.
    pub fn try_get_or_else_update<E>(
        &mut self,
        producer: impl FnOnce() -> Result<JsNode, E>,
    ) -> Result<&JsNode, E> {
        if self.value.is_none() {
            self.value = Some(producer()?);
        }
        Ok(self.value.as_ref().unwrap_or(&SKIP))
    }

    pub fn invalidate(&mut self) {
        self.value = None;
    }
}

/// One-shot per-class pieces, valid for one class version.
#[derive(Default)]
pub struct DesugaredClassCache {
    pub constructor: OneTimeCache,
    pub exported_members: OneTimeCache,
    pub instance_tests: OneTimeCache,
    pub type_data: OneTimeCache,
    pub set_type_data: OneTimeCache,
    pub module_accessor: OneTimeCache,
    pub class_exports: OneTimeCache,
}

/// Memoized desugared tree of one method.
#[derive(Default)]
pub struct MethodCache {
    tree: Option<JsNode>,
    version: Option<String>,
    used: bool,
}

impl MethodCache {
    fn start_run(&mut self) {
        self.used = false;
    }

    /// Return the stored tree iff the stored version equals the requested
    /// one; `None` never matches. On a miss the producer runs and both
    /// tree and version are stored.
    pub fn get_or_else_update(
        &mut self,
        version: Option<&str>,
        producer: impl FnOnce() -> JsNode,
        stats: &mut CacheStats,
    ) -> &JsNode {
        self.used = true;
        let hit = match (&self.version, version) {
            (Some(stored), Some(requested)) => stored.as_str() == requested && self.tree.is_some(),
            _ => false,
        };
        if hit {
            stats.methods_reused += 1;
        } else {
            stats.methods_invalidated += 1;
            self.tree = Some(producer());
            self.version = version.map(str::to_string);
        }
        self.tree.as_ref().unwrap_or(&SKIP)
    }

    pub fn invalidate(&mut self) {
        self.tree = None;
        self.version = None;
    }

    fn clean_after_run(&mut self) -> bool {
        self.used
    }
}

/// Cache of one class, keyed externally by its ancestor list.
#[derive(Default)]
pub struct ClassCache {
    /// Current one-shot cache and the class version it was built for.
    cache: Option<(Option<String>, DesugaredClassCache)>,
    used: bool,
    method_caches: FxHashMap<String, MethodCache>,
    static_method_caches: FxHashMap<String, MethodCache>,
}

impl ClassCache {
    pub fn start_run(&mut self) {
        self.used = false;
        for cache in self.method_caches.values_mut() {
            cache.start_run();
        }
        for cache in self.static_method_caches.values_mut() {
            cache.start_run();
        }
    }

    /// Fetch the one-shot cache for the given class version, replacing it
    /// when the version is absent, unknown, or different. A repeat fetch
    /// within the same run returns the current cache as-is: it neither
    /// counts statistics again nor re-clears slots filled earlier in the
    /// run.
    pub fn get_cache(
        &mut self,
        version: Option<&str>,
        stats: &mut CacheStats,
    ) -> &mut DesugaredClassCache {
        let first_fetch = !self.used;
        self.used = true;
        if first_fetch {
            let reusable = matches!(
                &self.cache,
                Some((Some(stored), _)) if version.is_some_and(|v| v == stored.as_str())
            );
            if reusable {
                stats.classes_reused += 1;
            } else {
                stats.classes_invalidated += 1;
                self.cache = Some((
                    version.map(str::to_string),
                    DesugaredClassCache::default(),
                ));
            }
        }
        &mut self.cache.get_or_insert_with(Default::default).1
    }

    /// Drop the current one-shot cache without touching method caches.
    /// Used when per-class knowledge (not the version) changed.
    pub fn drop_current(&mut self) {
        self.cache = None;
    }

    pub fn method_cache(&mut self, method_name: &str) -> &mut MethodCache {
        self.method_caches
            .entry(method_name.to_string())
            .or_default()
    }

    pub fn static_method_cache(&mut self, method_name: &str) -> &mut MethodCache {
        self.static_method_caches
            .entry(method_name.to_string())
            .or_default()
    }

    /// Invalidate one method tree, member or static.
    pub fn invalidate_method(&mut self, method_name: &str, is_static: bool) {
        let caches = if is_static {
            &mut self.static_method_caches
        } else {
            &mut self.method_caches
        };
        if let Some(cache) = caches.get_mut(method_name) {
            cache.invalidate();
        }
    }

    /// Invalidate the exported-member one-shot slots.
    pub fn invalidate_exported_members(&mut self) {
        if let Some((_, cache)) = &mut self.cache {
            cache.exported_members.invalidate();
            cache.class_exports.invalidate();
        }
    }

    /// Retain sub-caches used this run; report whether this class cache
    /// survives at all.
    pub fn clean_after_run(&mut self) -> bool {
        self.method_caches.retain(|_, c| c.clean_after_run());
        self.static_method_caches.retain(|_, c| c.clean_after_run());
        self.used || !self.method_caches.is_empty() || !self.static_method_caches.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/caches.rs"]
mod tests;
