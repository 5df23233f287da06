//! The emitter driver.
//!
//! One `Emitter` owns the incremental state (class caches and the
//! ctor-opt tracker) for its lifetime; two emitters share nothing. A run
//! is single-threaded and runs to completion:
//!
//! 1. begin the tracker run and apply cross-reference invalidations
//! 2. assign type tags for the unit
//! 3. emit classes in (ancestor count, encoded name) order — a single
//!    pass for non-strong modes, the seven-phase core-library splice for
//!    strong mode
//! 4. retain used caches, promote the ctor-opt set, report statistics
//!
//! On error the run aborts without step 4; stale cache entries are
//! invalidated naturally by version mismatches on the next run.

use rustc_hash::FxHashMap;

use crate::builder::{add_lines, JsTreeBuilder};
use crate::caches::{CacheStats, ClassCache};
use crate::class_emitter::ClassEmitter;
use crate::corelib;
use crate::ctor_opt::{CtorOptTracker, MethodRef};
use crate::desugar::GlobalEnv;
use crate::error::EmitError;
use crate::javascript::JsNode;
use crate::names;
use crate::type_tags::TypeTags;
use slink_common::{OutputMode, Semantics};
use slink_ir::definitions;
use slink_ir::{ClassKind, LinkedClass, LinkingUnit};

pub struct Emitter {
    semantics: Semantics,
    mode: OutputMode,
    core_js_lib: Option<String>,
    class_caches: FxHashMap<Vec<String>, ClassCache>,
    tracker: CtorOptTracker,
}

impl Emitter {
    pub fn new(semantics: Semantics, mode: OutputMode) -> Self {
        Self {
            semantics,
            mode,
            core_js_lib: None,
            class_caches: FxHashMap::default(),
            tracker: CtorOptTracker::new(),
        }
    }

    /// Historical constructor without an output mode; resolves to
    /// ES5-Global.
    pub fn with_default_mode(semantics: Semantics) -> Self {
        Self::new(semantics, OutputMode::default())
    }

    pub fn output_mode(&self) -> OutputMode {
        self.mode
    }

    pub fn semantics(&self) -> Semantics {
        self.semantics
    }

    /// Override the embedded core-library stand-in with the distributed
    /// blob.
    pub fn set_core_js_lib(&mut self, text: impl Into<String>) {
        self.core_js_lib = Some(text.into());
    }

    fn core_js_lib(&self) -> &str {
        match &self.core_js_lib {
            Some(text) => text,
            None if self.mode.is_strong() => corelib::STRONG_MODE_CORE_JS_LIB,
            None => corelib::CORE_JS_LIB,
        }
    }

    // =========================================================================
    // Public driver API
    // =========================================================================

    /// Prelude, emission, postlude.
    pub fn emit_all(
        &mut self,
        unit: &LinkingUnit,
        builder: &mut dyn JsTreeBuilder,
    ) -> Result<CacheStats, EmitError> {
        self.emit_prelude(builder);
        let stats = self.emit(unit, builder)?;
        self.emit_postlude(builder);
        Ok(stats)
    }

    /// Emit the unit's classes into `builder`.
    #[tracing::instrument(level = "debug", skip_all, fields(classes = unit.classes.len(), mode = ?self.mode))]
    pub fn emit(
        &mut self,
        unit: &LinkingUnit,
        builder: &mut dyn JsTreeBuilder,
    ) -> Result<CacheStats, EmitError> {
        let mut stats = CacheStats::default();

        for cache in self.class_caches.values_mut() {
            cache.start_run();
        }
        let (invalidations, changed) = self.tracker.begin_run(unit);
        for method_ref in &invalidations {
            self.apply_invalidation(unit, method_ref);
        }
        // A class whose own ctor-opt status changed regenerates its
        // one-shot pieces (the fused constructor lives there).
        for class_name in &changed {
            if let Some(cls) = unit.class_by_name(class_name) {
                if let Some(cache) = self.class_caches.get_mut(&cls.ancestors) {
                    cache.drop_current();
                }
            }
        }

        let tags = TypeTags::assign(unit)?;
        let mut sorted: Vec<&LinkedClass> = unit.classes.iter().collect();
        sorted.sort_by(|a, b| {
            a.ancestors
                .len()
                .cmp(&b.ancestors.len())
                .then_with(|| a.encoded_name.cmp(&b.encoded_name))
        });

        {
            let Self {
                ref tracker,
                ref mut class_caches,
                ref core_js_lib,
                semantics,
                mode,
                ..
            } = *self;
            let env = GlobalEnv::new(mode, unit, tracker);
            let class_emitter = ClassEmitter::new(&env, &tags, semantics);
            if mode.is_strong() {
                let core = match core_js_lib {
                    Some(text) => text.as_str(),
                    None => corelib::STRONG_MODE_CORE_JS_LIB,
                };
                emit_strong_mode(
                    class_caches,
                    &class_emitter,
                    &env,
                    &sorted,
                    core,
                    builder,
                    &mut stats,
                )?;
            } else {
                for &cls in &sorted {
                    emit_class(
                        class_caches,
                        &class_emitter,
                        &env,
                        cls,
                        mode,
                        builder,
                        &mut stats,
                    )?;
                }
            }
        }

        self.class_caches.retain(|_, cache| cache.clean_after_run());
        self.tracker.end_run();
        tracing::debug!(
            classes_reused = stats.classes_reused,
            classes_invalidated = stats.classes_invalidated,
            methods_reused = stats.methods_reused,
            methods_invalidated = stats.methods_invalidated,
            "emitter run finished"
        );
        Ok(stats)
    }

    /// Append literal text line by line, before the prelude.
    pub fn emit_custom_header(&self, text: &str, builder: &mut dyn JsTreeBuilder) {
        add_lines(builder, text);
    }

    /// Append literal text line by line, after the postlude.
    pub fn emit_custom_footer(&self, text: &str, builder: &mut dyn JsTreeBuilder) {
        add_lines(builder, text);
    }

    pub fn emit_prelude(&self, builder: &mut dyn JsTreeBuilder) {
        match self.mode {
            OutputMode::ECMAScript51Global => {
                builder.add_line("'use strict';");
                add_lines(builder, self.core_js_lib());
            }
            OutputMode::ECMAScript51Isolated | OutputMode::ECMAScript6 => {
                builder.add_line("(function(){");
                builder.add_line("'use strict';");
                add_lines(builder, self.core_js_lib());
            }
            OutputMode::ECMAScript6StrongMode => {
                builder.add_line(
                    "(function(__this, __ScalaJSEnv, __global, $jsSelect, $jsAssign, \
                     $jsDelete, $propertiesOf, $weakFun) {",
                );
                builder.add_line("'use strict';");
                builder.add_line("'use strong';");
                // The core library is spliced during `emit`.
            }
        }
    }

    pub fn emit_postlude(&self, builder: &mut dyn JsTreeBuilder) {
        match self.mode {
            OutputMode::ECMAScript51Global => {}
            OutputMode::ECMAScript51Isolated | OutputMode::ECMAScript6 => {
                builder.add_line("}).call(this);");
            }
            OutputMode::ECMAScript6StrongMode => {
                builder.add_line(
                    "})(this, (typeof __ScalaJSEnv !== 'undefined') ? __ScalaJSEnv : void 0, \
                     (typeof global !== 'undefined') ? global : void 0, \
                     function(x,p){'use strict'; return x[p];}, \
                     function(x,p,v){'use strict'; x[p]=v;}, \
                     function(x,p){'use strict'; delete x[p];}, \
                     function(x){'use strict'; const r=[]; for (const p in x) r['push'](p); return r;}, \
                     function(f){'use strict'; return function(...args){ return f['apply'](void 0, args); }});",
                );
            }
        }
    }

    // =========================================================================
    // Invalidation plumbing
    // =========================================================================

    fn apply_invalidation(&mut self, unit: &LinkingUnit, method_ref: &MethodRef) {
        // A caller no longer in the unit has no cache worth invalidating;
        // retention will drop it.
        let Some(cls) = unit.class_by_name(&method_ref.class_name) else {
            return;
        };
        let Some(cache) = self.class_caches.get_mut(&cls.ancestors) else {
            return;
        };
        if method_ref.is_export_sentinel() {
            cache.invalidate_exported_members();
        } else {
            cache.invalidate_method(&method_ref.method_name, method_ref.is_static);
            // Constructor bodies can be fused into the one-shot
            // constructor piece; drop it along with the method tree.
            if definitions::is_constructor_name(&method_ref.method_name) {
                cache.drop_current();
            }
        }
    }
}

// =============================================================================
// Per-class emission (non-strong modes)
// =============================================================================

struct ClassTrees {
    statics: Vec<JsNode>,
    constructor: Option<JsNode>,
    members: Vec<JsNode>,
    exported: JsNode,
    instance_tests: JsNode,
    type_data: Option<JsNode>,
    set_type_data: Option<JsNode>,
    module_accessor: Option<JsNode>,
    class_exports: JsNode,
}

/// Generate (or fetch from cache) every piece of one class.
fn class_trees(
    class_caches: &mut FxHashMap<Vec<String>, ClassCache>,
    class_emitter: &ClassEmitter<'_>,
    env: &GlobalEnv<'_>,
    cls: &LinkedClass,
    stats: &mut CacheStats,
) -> Result<ClassTrees, EmitError> {
    let cache = class_caches.entry(cls.ancestors.clone()).or_default();
    let is_interface = cls.kind == ClassKind::Interface;
    let ctor_opt = env.is_ctor_opt(&cls.encoded_name);

    let mut statics = Vec::new();
    for method in &cls.static_methods {
        let tree = cache
            .static_method_cache(method.name.text())
            .get_or_else_update(
                method.version.as_deref(),
                || class_emitter.gen_static_method(cls, method),
                stats,
            )
            .clone();
        statics.push(tree);
    }

    let mut members = Vec::new();
    for method in &cls.member_methods {
        // The fused constructor already carries the init body.
        if !is_interface && ctor_opt && method.is_constructor() {
            continue;
        }
        let tree = cache
            .method_cache(method.name.text())
            .get_or_else_update(
                method.version.as_deref(),
                || {
                    if is_interface {
                        class_emitter.gen_default_method(cls, method)
                    } else {
                        class_emitter.gen_member_method(cls, method)
                    }
                },
                stats,
            )
            .clone();
        members.push(tree);
    }

    let dcc = cache.get_cache(cls.version.as_deref(), stats);
    let constructor = if ClassEmitter::needs_constructor(cls) {
        Some(
            dcc.constructor
                .try_get_or_else_update(|| class_emitter.gen_constructor(cls))?
                .clone(),
        )
    } else {
        None
    };
    let exported = dcc
        .exported_members
        .try_get_or_else_update(|| class_emitter.gen_exported_members(cls))?
        .clone();
    let instance_tests = dcc
        .instance_tests
        .get_or_else_update(|| class_emitter.gen_instance_tests(cls))
        .clone();
    let type_data = if cls.has_runtime_type_info {
        Some(
            dcc.type_data
                .get_or_else_update(|| class_emitter.gen_type_data(cls))
                .clone(),
        )
    } else {
        None
    };
    let set_type_data = if env.mode.is_strong() && ClassEmitter::needs_set_type_data(cls) {
        Some(
            dcc.set_type_data
                .get_or_else_update(|| class_emitter.gen_set_type_data(cls))
                .clone(),
        )
    } else {
        None
    };
    let module_accessor = if cls.kind.has_module_accessor() {
        Some(
            dcc.module_accessor
                .get_or_else_update(|| class_emitter.gen_module_accessor(cls))
                .clone(),
        )
    } else {
        None
    };
    let class_exports = dcc
        .class_exports
        .get_or_else_update(|| class_emitter.gen_class_exports(cls))
        .clone();

    Ok(ClassTrees {
        statics,
        constructor,
        members,
        exported,
        instance_tests,
        type_data,
        set_type_data,
        module_accessor,
        class_exports,
    })
}

/// Flatten a cached `Sequence` into class-body members.
fn sequence_items(tree: JsNode) -> Vec<JsNode> {
    match tree {
        JsNode::Sequence(items) => items,
        JsNode::Skip => Vec::new(),
        other => vec![other],
    }
}

/// Assemble the `class ... { }` node of a class-syntax mode.
fn assemble_class_node(
    mode: OutputMode,
    cls: &LinkedClass,
    trees: &ClassTrees,
    strong_name: Option<String>,
) -> JsNode {
    let mut class_members = Vec::new();
    if let Some(ctor) = &trees.constructor {
        class_members.push(ctor.clone());
    }
    class_members.extend(trees.members.iter().cloned());
    class_members.extend(sequence_items(trees.exported.clone()));
    class_members.extend(trees.statics.iter().cloned());
    JsNode::Class {
        name: strong_name,
        extends: cls
            .super_class
            .as_deref()
            .map(|s| Box::new(names::class_var(mode, s))),
        members: class_members,
    }
}

fn emit_class(
    class_caches: &mut FxHashMap<Vec<String>, ClassCache>,
    class_emitter: &ClassEmitter<'_>,
    env: &GlobalEnv<'_>,
    cls: &LinkedClass,
    mode: OutputMode,
    builder: &mut dyn JsTreeBuilder,
    stats: &mut CacheStats,
) -> Result<(), EmitError> {
    let trees = class_trees(class_caches, class_emitter, env, cls, stats)?;

    if mode.uses_classes() && trees.constructor.is_some() {
        let class_node = assemble_class_node(mode, cls, &trees, None);
        builder.add_tree(&JsNode::assign_stat(
            names::class_var(mode, &cls.encoded_name),
            class_node,
        ));
        for wiring in class_emitter.gen_prototype_tag_wiring(cls) {
            builder.add_tree(&wiring);
        }
    } else {
        for tree in &trees.statics {
            builder.add_tree(tree);
        }
        if let Some(ctor) = &trees.constructor {
            builder.add_tree(ctor);
        }
        for tree in &trees.members {
            builder.add_tree(tree);
        }
        builder.add_tree(&trees.exported);
    }

    builder.add_tree(&trees.instance_tests);
    if let Some(type_data) = &trees.type_data {
        builder.add_tree(type_data);
    }
    if let Some(module_accessor) = &trees.module_accessor {
        builder.add_tree(module_accessor);
    }
    builder.add_tree(&trees.class_exports);
    Ok(())
}

// =============================================================================
// Strong-mode assembly
// =============================================================================

fn emit_strong_mode(
    class_caches: &mut FxHashMap<Vec<String>, ClassCache>,
    class_emitter: &ClassEmitter<'_>,
    env: &GlobalEnv<'_>,
    sorted: &[&LinkedClass],
    core_js_lib: &str,
    builder: &mut dyn JsTreeBuilder,
    stats: &mut CacheStats,
) -> Result<(), EmitError> {
    let mode = OutputMode::ECMAScript6StrongMode;

    // Every phase sees every class, but each class's pieces are computed
    // (or fetched) exactly once per run, so cache statistics count each
    // method once.
    let mut all_trees = Vec::with_capacity(sorted.len());
    for &cls in sorted {
        all_trees.push(class_trees(class_caches, class_emitter, env, cls, stats)?);
    }

    let mut next_marker = 0;
    for line in core_js_lib.lines() {
        if next_marker < corelib::SPLICE_MARKERS.len()
            && line == corelib::SPLICE_MARKERS[next_marker]
        {
            match next_marker {
                // ///INSERT DECLARE TYPE DATA HERE///
                0 => {
                    for &cls in sorted {
                        if cls.has_runtime_type_info {
                            builder.add_tree(&JsNode::let_decl(
                                names::strong_field_ident("d", &cls.encoded_name),
                                Some(JsNode::Null),
                            ));
                        }
                    }
                }
                // ///INSERT DECLARE MODULES HERE///
                1 => {
                    for &cls in sorted {
                        if cls.kind.has_module_accessor() {
                            builder.add_tree(&class_emitter.gen_module_declaration(cls));
                        }
                    }
                }
                // ///INSERT IS AND AS FUNCTIONS HERE///
                2 => {
                    for trees in &all_trees {
                        builder.add_tree(&trees.instance_tests);
                    }
                }
                // ///INSERT CLASSES HERE///
                3 => {
                    for (&cls, trees) in sorted.iter().zip(&all_trees) {
                        if trees.constructor.is_some() {
                            let name =
                                Some(names::strong_field_ident("c", &cls.encoded_name));
                            builder.add_tree(&assemble_class_node(mode, cls, trees, name));
                            for wiring in class_emitter.gen_prototype_tag_wiring(cls) {
                                builder.add_tree(&wiring);
                            }
                        } else {
                            // Interfaces: default methods and namespace
                            // statics.
                            for tree in &trees.members {
                                builder.add_tree(tree);
                            }
                            for tree in &trees.statics {
                                builder.add_tree(tree);
                            }
                        }
                        if let Some(module_accessor) = &trees.module_accessor {
                            builder.add_tree(module_accessor);
                        }
                    }
                }
                // ///INSERT CREATE TYPE DATA HERE///
                4 => {
                    for trees in &all_trees {
                        if let Some(type_data) = &trees.type_data {
                            builder.add_tree(type_data);
                        }
                        if let Some(set_type_data) = &trees.set_type_data {
                            builder.add_tree(set_type_data);
                        }
                    }
                }
                // ///INSERT EXPORTS HERE///
                5 => {
                    for trees in &all_trees {
                        builder.add_tree(&trees.class_exports);
                    }
                }
                // ///THE END/// is consumed without replacement.
                _ => {}
            }
            next_marker += 1;
        } else {
            builder.add_line(line);
        }
    }

    if next_marker < corelib::SPLICE_MARKERS.len() {
        return Err(EmitError::MissingSpliceMarker(
            corelib::SPLICE_MARKERS[next_marker],
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/emitter.rs"]
mod tests;
