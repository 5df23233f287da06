//! Per-class tree generation.
//!
//! One `ClassEmitter` is built per run and generates, for a single linked
//! class, every output piece whose predicate holds: constructor, methods,
//! properties, instance tests, runtime type data, module accessor, and
//! exports. Pieces come back as plain trees; the driver decides where
//! they land (statement stream, class body, or strong-mode phase).

use crate::ctor_opt::{MethodRef, CONSTRUCTOR_EXPORT_SENTINEL, EXPORTED_MEMBER_SENTINEL};
use crate::desugar::{literal_to_js, Desugarer, GlobalEnv};
use crate::error::EmitError;
use crate::javascript::{JsNode, JsPropName};
use crate::names;
use crate::type_tags::TypeTags;
use slink_common::{CheckedBehavior, OutputMode, Semantics};
use slink_ir::definitions;
use slink_ir::trees::{MethodDef, PropertyName, Tree};
use slink_ir::{ClassExport, ClassKind, ExportedMember, LinkedClass};

pub struct ClassEmitter<'a> {
    env: &'a GlobalEnv<'a>,
    tags: &'a TypeTags,
    semantics: Semantics,
    mode: OutputMode,
}

impl<'a> ClassEmitter<'a> {
    pub fn new(env: &'a GlobalEnv<'a>, tags: &'a TypeTags, semantics: Semantics) -> Self {
        Self {
            env,
            tags,
            semantics,
            mode: env.mode,
        }
    }

    fn desugarer(&self, caller: MethodRef) -> Desugarer<'a, 'a> {
        Desugarer::new(self.env, caller)
    }

    fn class_var(&self, cls: &LinkedClass) -> JsNode {
        names::class_var(self.mode, &cls.encoded_name)
    }

    fn prototype(&self, cls: &LinkedClass) -> JsNode {
        JsNode::prop(self.class_var(cls), "prototype")
    }

    fn var_decl(&self, name: impl Into<String>, init: Option<JsNode>) -> JsNode {
        if self.mode.is_strong() {
            JsNode::let_decl(name, init)
        } else {
            JsNode::var_decl(name, init)
        }
    }

    // =========================================================================
    // Static methods
    // =========================================================================

    /// ES5 modes assign into the `s` namespace; class-syntax modes emit a
    /// static member definition when the class has a definition to carry
    /// it (interfaces and uninstantiated classes fall back to the
    /// namespace form).
    pub fn gen_static_method(&self, cls: &LinkedClass, method: &MethodDef) -> JsNode {
        let caller = MethodRef::new(&cls.encoded_name, method.name.text(), true);
        let func = self
            .desugarer(caller)
            .desugar_to_function(&method.params, &method.body, false);
        if self.mode.uses_classes() && Self::needs_constructor(cls) {
            let JsNode::Function { params, body, .. } = func else {
                return JsNode::Skip;
            };
            JsNode::MethodDef {
                is_static: true,
                name: JsPropName::Ident(method.name.text().to_string()),
                params,
                body,
            }
        } else if self.mode.is_strong() {
            let JsNode::Function { params, body, .. } = func else {
                return JsNode::Skip;
            };
            JsNode::Function {
                name: Some(names::strong_field_ident(
                    "s",
                    &names::static_method_name(&cls.encoded_name, method.name.text()),
                )),
                params,
                body,
            }
        } else {
            JsNode::assign_stat(
                names::env_field(
                    self.mode,
                    "s",
                    &names::static_method_name(&cls.encoded_name, method.name.text()),
                ),
                func,
            )
        }
    }

    // =========================================================================
    // Constructor
    // =========================================================================

    /// Whether a constructor piece is generated at all.
    pub fn needs_constructor(cls: &LinkedClass) -> bool {
        cls.has_instances && cls.kind.is_any_scalajs_defined_class()
    }

    /// Parameters and body statements of the constructor function.
    fn constructor_params_and_body(
        &self,
        cls: &LinkedClass,
    ) -> Result<(Vec<String>, Vec<JsNode>), EmitError> {
        if cls.kind.is_js_class() {
            // The constructor of a JS class is the body of its exported
            // member named "constructor"; its absence is a bug in the
            // input.
            let ctor = cls.exported_members.iter().find_map(|m| match m {
                ExportedMember::Method(m)
                    if matches!(&m.name, PropertyName::StringLit(n) if n == "constructor") =>
                {
                    Some(m)
                }
                _ => None,
            });
            let Some(ctor) = ctor else {
                return Err(EmitError::MissingJSConstructor(cls.encoded_name.clone()));
            };
            let caller = MethodRef::new(&cls.encoded_name, ctor.name.text(), false);
            let func = self
                .desugarer(caller)
                .desugar_to_function(&ctor.params, &ctor.body, false);
            return match func {
                JsNode::Function { params, body, .. } => Ok((params, body)),
                _ => Ok((Vec::new(), Vec::new())),
            };
        }

        let mut body: Vec<JsNode> = cls
            .fields
            .iter()
            .map(|f| JsNode::assign_stat(JsNode::prop(JsNode::This, f.name.clone()), literal_to_js(&f.zero)))
            .collect();

        if self.env.is_ctor_opt(&cls.encoded_name) {
            // Fused constructor: the single init method's body moves into
            // the constructor and its parameters become the constructor's.
            if let Some(init) = cls.member_methods.iter().find(|m| m.is_constructor()) {
                let caller = MethodRef::new(&cls.encoded_name, init.name.text(), false);
                let func =
                    self.desugarer(caller)
                        .desugar_to_function(&init.params, &init.body, false);
                if let JsNode::Function {
                    params,
                    body: init_body,
                    ..
                } = func
                {
                    body.extend(init_body);
                    return Ok((params, body));
                }
            }
        }
        Ok((Vec::new(), body))
    }

    /// The full ES5 constructor piece (constructor function, prototype
    /// chain, tag wiring, inheritable-constructor helper), or the
    /// `constructor` member definition for class-syntax modes.
    pub fn gen_constructor(&self, cls: &LinkedClass) -> Result<JsNode, EmitError> {
        let is_object = cls.encoded_name == definitions::OBJECT_CLASS;
        if !is_object && cls.super_class.is_none() && !cls.kind.is_js_class() {
            return Err(EmitError::MissingSuperClass(cls.encoded_name.clone()));
        }
        let (params, mut ctor_body) = self.constructor_params_and_body(cls)?;

        if self.mode.uses_classes() {
            // JS-class constructor bodies manage their own super call.
            if cls.super_class.is_some() && !cls.kind.is_js_class() {
                let mut with_super = vec![JsNode::expr_stmt(JsNode::call(
                    JsNode::id("super"),
                    vec![],
                ))];
                with_super.append(&mut ctor_body);
                ctor_body = with_super;
            }
            return Ok(JsNode::MethodDef {
                is_static: false,
                name: JsPropName::Ident("constructor".to_string()),
                params,
                body: ctor_body,
            });
        }

        let class_var = self.class_var(cls);
        let proto = self.prototype(cls);
        let mut pieces = vec![
            JsNode::doc_comment("@constructor"),
            JsNode::assign_stat(class_var.clone(), JsNode::func(None, params, ctor_body)),
        ];
        if let Some(super_class) = &cls.super_class {
            pieces.push(JsNode::assign_stat(
                proto.clone(),
                JsNode::new_call(names::env_field(self.mode, "h", super_class), vec![]),
            ));
        }
        pieces.push(JsNode::assign_stat(
            JsNode::prop(proto.clone(), "constructor"),
            class_var,
        ));
        pieces.extend(self.gen_prototype_tag_wiring(cls));

        // Inheritable constructor: subclasses chain through `h`, which
        // shares the prototype without running field initializers.
        let h_var = names::env_field(self.mode, "h", &cls.encoded_name);
        pieces.push(JsNode::doc_comment("@constructor"));
        pieces.push(JsNode::assign_stat(
            h_var.clone(),
            JsNode::func(None, vec![], vec![]),
        ));
        pieces.push(JsNode::assign_stat(JsNode::prop(h_var, "prototype"), proto));
        Ok(JsNode::Sequence(pieces))
    }

    /// The `$typeTag` prototype assignment. Part of the ES5 constructor
    /// piece; emitted after the class in class-syntax modes. The
    /// `$classData` counterpart travels with the type-data piece, which
    /// runs after the data exists.
    pub fn gen_prototype_tag_wiring(&self, cls: &LinkedClass) -> Vec<JsNode> {
        let proto = self.prototype(cls);
        let mut pieces = Vec::new();
        if let Some(tag) = self.tags.tag(&cls.encoded_name) {
            pieces.push(JsNode::assign_stat(
                JsNode::prop(proto, "$typeTag"),
                JsNode::Int(tag),
            ));
        }
        pieces
    }

    // =========================================================================
    // Methods
    // =========================================================================

    /// Interface default method: a standalone function taking the
    /// receiver explicitly, so implementors' statics can dispatch through
    /// it.
    pub fn gen_default_method(&self, cls: &LinkedClass, method: &MethodDef) -> JsNode {
        let caller = MethodRef::new(&cls.encoded_name, method.name.text(), false);
        let func = self
            .desugarer(caller)
            .with_explicit_this("$thiz")
            .desugar_to_function(&method.params, &method.body, false);
        if self.mode.is_strong() {
            let JsNode::Function { params, body, .. } = func else {
                return JsNode::Skip;
            };
            JsNode::Function {
                name: Some(format!("$f_{}", method.name.text())),
                params,
                body,
            }
        } else {
            JsNode::assign_stat(
                names::default_method(self.mode, &cls.encoded_name, method.name.text()),
                func,
            )
        }
    }

    pub fn gen_member_method(&self, cls: &LinkedClass, method: &MethodDef) -> JsNode {
        let caller = MethodRef::new(&cls.encoded_name, method.name.text(), false);
        let func = self.desugarer(caller).desugar_to_function(
            &method.params,
            &method.body,
            method.is_constructor(),
        );
        if self.mode.uses_classes() {
            let JsNode::Function { params, body, .. } = func else {
                return JsNode::Skip;
            };
            JsNode::MethodDef {
                is_static: false,
                name: JsPropName::Ident(method.name.text().to_string()),
                params,
                body,
            }
        } else {
            JsNode::assign_stat(
                JsNode::prop(self.prototype(cls), method.name.text()),
                func,
            )
        }
    }

    // =========================================================================
    // Exported members
    // =========================================================================

    pub fn gen_exported_members(&self, cls: &LinkedClass) -> Result<JsNode, EmitError> {
        let mut pieces = Vec::new();
        for member in &cls.exported_members {
            match member {
                ExportedMember::Method(method) => {
                    // A JS class's "constructor" member became the class
                    // constructor.
                    if cls.kind.is_js_class() && method.name.text() == "constructor" {
                        continue;
                    }
                    pieces.push(self.gen_exported_method(cls, method));
                }
                ExportedMember::Property(property) => {
                    if property.getter.is_none() && property.setter.is_none() {
                        return Err(EmitError::IllegalExportedMember(
                            cls.encoded_name.clone(),
                            property.name.text().to_string(),
                        ));
                    }
                    pieces.push(self.gen_exported_property(cls, property));
                }
            }
        }
        Ok(JsNode::Sequence(pieces))
    }

    fn gen_exported_method(&self, cls: &LinkedClass, method: &MethodDef) -> JsNode {
        let caller = MethodRef::new(&cls.encoded_name, EXPORTED_MEMBER_SENTINEL, false);
        let func = self
            .desugarer(caller)
            .desugar_to_function(&method.params, &method.body, false);
        if self.mode.uses_classes() {
            let JsNode::Function { params, body, .. } = func else {
                return JsNode::Skip;
            };
            JsNode::MethodDef {
                is_static: false,
                name: JsPropName::Str(method.name.text().to_string()),
                params,
                body,
            }
        } else {
            JsNode::assign_stat(
                JsNode::elem(self.prototype(cls), JsNode::str(method.name.text())),
                func,
            )
        }
    }

    fn gen_exported_property(
        &self,
        cls: &LinkedClass,
        property: &slink_ir::trees::PropertyDef,
    ) -> JsNode {
        let caller = MethodRef::new(&cls.encoded_name, EXPORTED_MEMBER_SENTINEL, false);
        let desugarer = self.desugarer(caller);
        let name = property.name.text();

        if self.mode.uses_classes() {
            let mut members = Vec::new();
            if let Some(getter) = &property.getter {
                let func = desugarer.desugar_to_function(&[], getter, false);
                if let JsNode::Function { body, .. } = func {
                    members.push(JsNode::Getter {
                        is_static: false,
                        name: JsPropName::Str(name.to_string()),
                        body,
                    });
                }
            }
            if let Some((param, setter)) = &property.setter {
                let func = desugarer.desugar_to_function(
                    std::slice::from_ref(param),
                    setter,
                    false,
                );
                if let JsNode::Function { body, .. } = func {
                    members.push(JsNode::Setter {
                        is_static: false,
                        name: JsPropName::Str(name.to_string()),
                        param: param.clone(),
                        body,
                    });
                }
            }
            return JsNode::Sequence(members);
        }

        let mut descriptor = Vec::new();
        if let Some(getter) = &property.getter {
            descriptor.push((
                JsPropName::Ident("get".to_string()),
                desugarer.desugar_to_function(&[], getter, false),
            ));
        }
        if let Some((param, setter)) = &property.setter {
            descriptor.push((
                JsPropName::Ident("set".to_string()),
                desugarer.desugar_to_function(std::slice::from_ref(param), setter, false),
            ));
        }
        descriptor.push((JsPropName::Ident("enumerable".to_string()), JsNode::Bool(true)));
        descriptor.push((
            JsPropName::Ident("configurable".to_string()),
            JsNode::Bool(true),
        ));
        JsNode::expr_stmt(JsNode::call(
            JsNode::prop(JsNode::id("Object"), "defineProperty"),
            vec![
                self.prototype(cls),
                JsNode::str(name),
                JsNode::ObjectLit(descriptor),
            ],
        ))
    }

    // =========================================================================
    // Instance tests
    // =========================================================================

    /// The instance-test piece: `is_C`/`as_C` when the class needs them,
    /// `isArrayOf_C`/`asArrayOf_C` always, plus the materialized subtype
    /// array when the interval list fragments.
    pub fn gen_instance_tests(&self, cls: &LinkedClass) -> JsNode {
        let mut pieces = Vec::new();
        if let Some(init) = self
            .tags
            .subtype_array_init(self.mode, &cls.encoded_name)
        {
            pieces.push(init);
        }
        if cls.needs_instance_tests() {
            pieces.push(self.gen_is_function(cls));
            pieces.push(self.gen_as_function(cls));
        }
        pieces.push(self.gen_is_array_of_function(cls));
        pieces.push(self.gen_as_array_of_function(cls));
        JsNode::Sequence(pieces)
    }

    fn emit_test_function(&self, field: &str, cls: &LinkedClass, params: Vec<String>, body: Vec<JsNode>) -> JsNode {
        let target = names::env_field(self.mode, field, &cls.encoded_name);
        if self.mode.is_strong() {
            JsNode::Function {
                name: Some(names::strong_field_ident(field, &cls.encoded_name)),
                params,
                body,
            }
        } else {
            JsNode::assign_stat(target, JsNode::func(None, params, body))
        }
    }

    fn gen_is_function(&self, cls: &LinkedClass) -> JsNode {
        let obj = JsNode::id("obj");
        let name = cls.encoded_name.as_str();

        let test = if name == definitions::OBJECT_CLASS {
            // Anything but null is an Object; undefined is boxed unit.
            JsNode::binary(obj.clone(), "!==", JsNode::Null)
        } else if name == definitions::BOXED_STRING_CLASS {
            JsNode::binary(JsNode::typeof_(obj.clone()), "===", JsNode::str("string"))
        } else if name == definitions::NOTHING_CLASS {
            JsNode::Bool(false)
        } else {
            let mut disjuncts = Vec::new();
            if definitions::ANCESTORS_OF_HIJACKED_NUMBER_CLASSES.contains(name) {
                disjuncts.push(JsNode::binary(
                    JsNode::typeof_(obj.clone()),
                    "===",
                    JsNode::str("number"),
                ));
            }
            if definitions::ANCESTORS_OF_HIJACKED_BOOLEAN_CLASSES.contains(name) {
                disjuncts.push(JsNode::binary(
                    JsNode::typeof_(obj.clone()),
                    "===",
                    JsNode::str("boolean"),
                ));
            }
            if definitions::ANCESTORS_OF_HIJACKED_STRING_CLASSES.contains(name) {
                disjuncts.push(JsNode::binary(
                    JsNode::typeof_(obj.clone()),
                    "===",
                    JsNode::str("string"),
                ));
            }
            if definitions::PSEUDO_ARRAY_ANCESTORS.contains(name) {
                // Arrays carry class data with a positive depth but no
                // interval-testable tag.
                disjuncts.push(JsNode::binary(
                    JsNode::truthy(JsNode::binary(
                        obj.clone(),
                        "&&",
                        JsNode::prop(obj.clone(), "$classData"),
                    )),
                    "&&",
                    JsNode::binary(
                        JsNode::prop(JsNode::prop(obj.clone(), "$classData"), "arrayDepth"),
                        ">",
                        JsNode::Int(0),
                    ),
                ));
            }
            let tag = JsNode::prop(obj.clone(), "$typeTag");
            disjuncts.push(JsNode::binary(
                JsNode::truthy(JsNode::binary(obj.clone(), "&&", tag.clone())),
                "&&",
                self.tags.interval_test(self.mode, name, tag),
            ));
            JsNode::or_all(disjuncts)
        };

        self.emit_test_function(
            "is",
            cls,
            vec!["obj".to_string()],
            vec![JsNode::ret(Some(test))],
        )
    }

    fn gen_as_function(&self, cls: &LinkedClass) -> JsNode {
        let obj = JsNode::id("obj");
        let body = if self.semantics.as_instance_ofs == CheckedBehavior::Unchecked {
            vec![JsNode::ret(Some(obj))]
        } else {
            let is_call = JsNode::call(
                names::env_field(self.mode, "is", &cls.encoded_name),
                vec![obj.clone()],
            );
            let cond = JsNode::binary(
                is_call,
                "||",
                JsNode::binary(obj.clone(), "===", JsNode::Null),
            );
            vec![JsNode::if_stat(
                cond,
                JsNode::ret(Some(obj.clone())),
                Some(JsNode::expr_stmt(JsNode::call(
                    names::env_helper(self.mode, "throwClassCastException"),
                    vec![obj, JsNode::str(cls.display_name())],
                ))),
            )]
        };
        self.emit_test_function("as", cls, vec!["obj".to_string()], body)
    }

    fn gen_is_array_of_function(&self, cls: &LinkedClass) -> JsNode {
        let obj = JsNode::id("obj");
        let depth = JsNode::id("depth");
        let body = if cls.encoded_name == definitions::OBJECT_CLASS {
            // Arrays of Object: exact depth, or deeper arrays of any
            // non-primitive base.
            let data = JsNode::id("data");
            vec![
                self.var_decl(
                    "data",
                    Some(JsNode::binary(
                        obj.clone(),
                        "&&",
                        JsNode::prop(obj, "$classData"),
                    )),
                ),
                JsNode::ret(Some(JsNode::binary(
                    JsNode::truthy(data.clone()),
                    "&&",
                    JsNode::binary(
                        JsNode::binary(
                            JsNode::prop(data.clone(), "arrayDepth"),
                            "===",
                            depth.clone(),
                        ),
                        "||",
                        JsNode::binary(
                            JsNode::binary(JsNode::prop(data.clone(), "arrayDepth"), ">", depth),
                            "&&",
                            JsNode::not(JsNode::prop(
                                JsNode::prop(data, "arrayBase"),
                                "isPrimitive",
                            )),
                        ),
                    ),
                ))),
            ]
        } else {
            let t = JsNode::id("t");
            vec![
                self.var_decl(
                    "t",
                    Some(JsNode::binary(
                        obj.clone(),
                        "&&",
                        JsNode::prop(obj, "$typeTag"),
                    )),
                ),
                JsNode::ret(Some(JsNode::binary(
                    JsNode::truthy(t.clone()),
                    "&&",
                    JsNode::binary(
                        JsNode::binary(t.clone(), "<", JsNode::Int(0)),
                        "&&",
                        JsNode::binary(
                            TypeTags::array_depth_test(t.clone(), depth),
                            "&&",
                            self.tags
                                .array_base_test(self.mode, &cls.encoded_name, t),
                        ),
                    ),
                ))),
            ]
        };
        self.emit_test_function(
            "isArrayOf",
            cls,
            vec!["obj".to_string(), "depth".to_string()],
            body,
        )
    }

    fn gen_as_array_of_function(&self, cls: &LinkedClass) -> JsNode {
        let obj = JsNode::id("obj");
        let depth = JsNode::id("depth");
        let body = if self.semantics.as_instance_ofs == CheckedBehavior::Unchecked {
            vec![JsNode::ret(Some(obj))]
        } else {
            let is_call = JsNode::call(
                names::env_field(self.mode, "isArrayOf", &cls.encoded_name),
                vec![obj.clone(), depth.clone()],
            );
            let cond = JsNode::binary(
                is_call,
                "||",
                JsNode::binary(obj.clone(), "===", JsNode::Null),
            );
            vec![JsNode::if_stat(
                cond,
                JsNode::ret(Some(obj.clone())),
                Some(JsNode::expr_stmt(JsNode::call(
                    names::env_helper(self.mode, "throwArrayCastException"),
                    vec![
                        obj,
                        JsNode::str(format!("L{};", cls.display_name())),
                        depth,
                    ],
                ))),
            )]
        };
        self.emit_test_function(
            "asArrayOf",
            cls,
            vec!["obj".to_string(), "depth".to_string()],
            body,
        )
    }

    // =========================================================================
    // Runtime type data
    // =========================================================================

    pub fn gen_type_data(&self, cls: &LinkedClass) -> JsNode {
        let name = cls.encoded_name.as_str();
        let ancestor_tags: Vec<JsNode> = cls
            .ancestors
            .iter()
            .filter_map(|a| self.tags.tag(a))
            .map(JsNode::Int)
            .collect();

        let is_raw_js_type = if cls.kind == ClassKind::RawJSType {
            JsNode::Bool(true)
        } else {
            JsNode::Undefined
        };
        let parent_data = match cls.super_class.as_deref() {
            Some(super_class) => names::env_field(self.mode, "d", super_class),
            None => JsNode::Undefined,
        };
        let is_instance_fun = if definitions::CLASSES_WHOSE_DATA_REFER_TO_THEIR_INSTANCE_TESTS
            .contains(name)
        {
            names::env_field(self.mode, "is", name)
        } else {
            JsNode::Undefined
        };
        let is_array_of_fun = if name == definitions::OBJECT_CLASS {
            names::env_field(self.mode, "isArrayOf", name)
        } else {
            JsNode::Undefined
        };

        let mut args = vec![
            JsNode::str(name),
            JsNode::Bool(cls.kind == ClassKind::Interface),
            JsNode::str(cls.display_name()),
            JsNode::ArrayLit(ancestor_tags),
            JsNode::Int(self.tags.tag(name).unwrap_or(0)),
            is_raw_js_type,
            parent_data,
            is_instance_fun,
            is_array_of_fun,
        ];
        // Strong mode keeps the full arity; other modes drop trailing
        // undefined arguments.
        if !self.mode.is_strong() {
            while matches!(args.last(), Some(JsNode::Undefined)) {
                args.pop();
            }
        }

        let create = JsNode::assign_stat(
            names::env_field(self.mode, "d", name),
            JsNode::call(
                JsNode::prop(
                    JsNode::new_call(names::type_data_ctor(self.mode), vec![]),
                    "initClass",
                ),
                args,
            ),
        );
        if Self::needs_constructor(cls) {
            // The prototype learns its class data once the data exists.
            JsNode::Sequence(vec![
                create,
                JsNode::assign_stat(
                    JsNode::prop(self.prototype(cls), "$classData"),
                    names::env_field(self.mode, "d", name),
                ),
            ])
        } else {
            create
        }
    }

    /// Whether the strong-mode `ClassData` table records this class.
    pub fn needs_set_type_data(cls: &LinkedClass) -> bool {
        cls.kind.is_class() && cls.has_instances && cls.has_runtime_type_info
    }

    pub fn gen_set_type_data(&self, cls: &LinkedClass) -> JsNode {
        let tag = self.tags.tag(&cls.encoded_name).unwrap_or(0);
        JsNode::assign_stat(
            JsNode::elem(names::class_data_table(self.mode), JsNode::Int(tag)),
            names::env_field(self.mode, "d", &cls.encoded_name),
        )
    }

    // =========================================================================
    // Module accessor
    // =========================================================================

    pub fn gen_module_accessor(&self, cls: &LinkedClass) -> JsNode {
        let name = cls.encoded_name.as_str();
        let instance = names::env_field(self.mode, "n", name);

        // The accessor instantiates its own class; route through the
        // desugarer so the ctor-opt decision and its dependency recording
        // apply.
        let ctor_name = cls
            .member_methods
            .iter()
            .find(|m| m.is_constructor())
            .map_or("init___", |m| m.name.text());
        let caller = MethodRef::new(name, ctor_name, false);
        let assign_module = JsNode::assign_stat(
            instance.clone(),
            self.desugarer(caller).desugar_tree(
                &Tree::new_instance(name, ctor_name, vec![]),
                false,
            ),
        );

        let body = match self.semantics.module_init {
            CheckedBehavior::Unchecked => vec![
                JsNode::if_stat(JsNode::not(instance.clone()), assign_module, None),
                JsNode::ret(Some(instance.clone())),
            ],
            CheckedBehavior::Compliant => vec![
                JsNode::if_stat(
                    JsNode::binary(instance.clone(), "===", JsNode::Undefined),
                    JsNode::Sequence(vec![
                        JsNode::assign_stat(instance.clone(), JsNode::Null),
                        assign_module,
                    ]),
                    None,
                ),
                JsNode::ret(Some(instance.clone())),
            ],
            CheckedBehavior::Fatal => {
                let message = format!(
                    "Initializer of {} called before completion of its super constructor",
                    cls.display_name()
                );
                let ube_var = names::class_var(
                    self.mode,
                    definitions::UNDEFINED_BEHAVIOR_ERROR_CLASS,
                );
                let ube = if self.mode.is_strong() {
                    JsNode::new_call(ube_var, vec![JsNode::str(message)])
                } else {
                    JsNode::call(
                        JsNode::prop(JsNode::new_call(ube_var, vec![]), "init___T"),
                        vec![JsNode::str(message)],
                    )
                };
                vec![
                    JsNode::if_stat(
                        JsNode::binary(instance.clone(), "===", JsNode::Undefined),
                        JsNode::Sequence(vec![
                            JsNode::assign_stat(instance.clone(), JsNode::Null),
                            assign_module,
                        ]),
                        Some(JsNode::if_stat(
                            JsNode::binary(instance.clone(), "===", JsNode::Null),
                            JsNode::throw(ube),
                            None,
                        )),
                    ),
                    JsNode::ret(Some(instance.clone())),
                ]
            }
        };

        if self.mode.is_strong() {
            // `$n_C` is declared in the DECLARE MODULES phase.
            JsNode::Function {
                name: Some(names::strong_field_ident("m", name)),
                params: vec![],
                body,
            }
        } else {
            JsNode::Sequence(vec![
                JsNode::assign_stat(instance, JsNode::Undefined),
                JsNode::assign_stat(
                    names::env_field(self.mode, "m", name),
                    JsNode::func(None, vec![], body),
                ),
            ])
        }
    }

    /// The strong-mode module field declaration.
    pub fn gen_module_declaration(&self, cls: &LinkedClass) -> JsNode {
        JsNode::let_decl(
            names::strong_field_ident("n", &cls.encoded_name),
            Some(JsNode::Undefined),
        )
    }

    // =========================================================================
    // Class exports
    // =========================================================================

    pub fn gen_class_exports(&self, cls: &LinkedClass) -> JsNode {
        let mut pieces = Vec::new();
        for export in &cls.class_exports {
            match export {
                ClassExport::Constructor {
                    name, params, body, ..
                } => {
                    let caller =
                        MethodRef::new(&cls.encoded_name, CONSTRUCTOR_EXPORT_SENTINEL, false);
                    let func = self
                        .desugarer(caller)
                        .desugar_to_function(params, body, false);
                    if self.mode.is_strong() {
                        pieces.push(JsNode::expr_stmt(JsNode::call(
                            JsNode::id("$exportCtor"),
                            vec![export_name_path(name), func],
                        )));
                    } else {
                        pieces.extend(self.export_namespace_assignment(name, func));
                    }
                }
                ClassExport::Module { name } => {
                    let accessor = names::env_field(self.mode, "m", &cls.encoded_name);
                    if self.mode.is_strong() {
                        pieces.push(JsNode::expr_stmt(JsNode::call(
                            JsNode::id("$export"),
                            vec![export_name_path(name), accessor],
                        )));
                    } else {
                        pieces.extend(self.export_namespace_assignment(name, accessor));
                    }
                }
            }
        }
        JsNode::Sequence(pieces)
    }

    /// Build the dotted namespace under the exports root and assign the
    /// value to its last segment.
    fn export_namespace_assignment(&self, dotted_name: &str, value: JsNode) -> Vec<JsNode> {
        let root = JsNode::prop(JsNode::id("ScalaJS"), "e");
        let parts: Vec<&str> = dotted_name.split('.').collect();
        let mut pieces = Vec::new();
        let mut holder = root;
        for part in &parts[..parts.len().saturating_sub(1)] {
            let slot = JsNode::elem(holder.clone(), JsNode::str(*part));
            pieces.push(JsNode::assign_stat(
                slot.clone(),
                JsNode::binary(slot.clone(), "||", JsNode::ObjectLit(vec![])),
            ));
            holder = slot;
        }
        if let Some(last) = parts.last() {
            pieces.push(JsNode::assign_stat(
                JsNode::elem(holder, JsNode::str(*last)),
                value,
            ));
        }
        pieces
    }
}

fn export_name_path(dotted_name: &str) -> JsNode {
    JsNode::ArrayLit(dotted_name.split('.').map(JsNode::str).collect())
}

#[cfg(test)]
#[path = "tests/class_emitter.rs"]
mod tests;
