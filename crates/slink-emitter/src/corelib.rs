//! Core JavaScript library handling.
//!
//! The core library is a pre-rendered text blob produced outside the
//! emitter. Non-strong modes paste it into the prelude unchanged. Strong
//! mode splices emitted pieces into it at fixed marker lines; the marker
//! set and their order are part of the blob's contract.

/// Strong-mode splice markers, in the order they must appear.
pub const SPLICE_MARKERS: &[&str] = &[
    "///INSERT DECLARE TYPE DATA HERE///",
    "///INSERT DECLARE MODULES HERE///",
    "///INSERT IS AND AS FUNCTIONS HERE///",
    "///INSERT CLASSES HERE///",
    "///INSERT CREATE TYPE DATA HERE///",
    "///INSERT EXPORTS HERE///",
    "///THE END///",
];

/// Minimal stand-in for the non-strong core library. The real blob ships
/// with the runtime distribution; embedders override it through
/// `Emitter::set_core_js_lib`.
pub const CORE_JS_LIB: &str = "\
var ScalaJS = {
  d: {}, c: {}, h: {}, n: {}, m: {}, s: {}, f: {}, e: {},
  is: {}, as: {}, isArrayOf: {}, asArrayOf: {}, Is: {},
  ClassData: [],
  TypeData: function() {
  },
  expandSubtypeArray: function(pairs) {
    var result = [];
    for (var i = 0; i < pairs.length; i += 2) {
      for (var tag = pairs[i]; tag <= pairs[(i + 1)]; tag++) {
        result[tag] = true;
      }
    }
    return result;
  },
  isScalaJSObject: function(obj) {
    return !!(obj && obj.$typeTag);
  },
  propertyName: function(obj) {
    for (var name in obj) {
      return name;
    }
  },
  throwClassCastException: function(instance, classFullName) {
    throw new ScalaJS.c.jl_ClassCastException().init___T(
      instance + \" is not an instance of \" + classFullName);
  },
  throwArrayCastException: function(instance, classArrayEncodedName, depth) {
    throw new ScalaJS.c.jl_ClassCastException().init___T(
      instance + \" is not an instance of \" + classArrayEncodedName);
  }
};
ScalaJS.TypeData.prototype.initClass = function(
    internalName, isInterface, fullName, ancestorTags, typeTag,
    isRawJSType, parentData, isInstanceFun, isArrayOfFun) {
  this.internalName = internalName;
  this.isInterface = isInterface;
  this.name = fullName;
  this.ancestorTags = ancestorTags;
  this.typeTag = typeTag;
  this.isRawJSType = !!isRawJSType;
  this.parentData = parentData;
  this.isInstance = isInstanceFun;
  this.isArrayOf = isArrayOfFun;
  this.isPrimitive = false;
  this.arrayDepth = 0;
  return this;
};";

/// Minimal stand-in for the strong-mode core library: declarations the
/// emitted pieces reference, with the splice markers in contract order.
pub const STRONG_MODE_CORE_JS_LIB: &str = "\
const $ClassData = [];
class $TypeData {
  initClass(internalName, isInterface, fullName, ancestorTags, typeTag,
      isRawJSType, parentData, isInstanceFun, isArrayOfFun) {
    this.internalName = internalName;
    this.isInterface = isInterface;
    this.name = fullName;
    this.ancestorTags = ancestorTags;
    this.typeTag = typeTag;
    this.isRawJSType = !!isRawJSType;
    this.parentData = parentData;
    this.isInstance = isInstanceFun;
    this.isArrayOf = isArrayOfFun;
    this.isPrimitive = false;
    this.arrayDepth = 0;
    return this;
  }
}
const $Is = {};
function $expandSubtypeArray(pairs) {
  const result = [];
  for (let i = 0; i < pairs.length; i += 2) {
    for (let tag = pairs[i]; tag <= pairs[(i + 1)]; tag++) {
      result[tag] = true;
    }
  }
  return result;
}
function $isScalaJSObject(obj) {
  return !!(obj && obj.$typeTag);
}
function $export(namePath, value) {
  let holder = __this;
  for (let i = 0; i < (namePath.length - 1); i++) {
    holder = $jsSelect(holder, namePath[i]) ||
      ($jsAssign(holder, namePath[i], {}), $jsSelect(holder, namePath[i]));
  }
  $jsAssign(holder, namePath[(namePath.length - 1)], value);
}
function $exportCtor(namePath, ctor) {
  $export(namePath, ctor);
}
function $throwClassCastException(instance, classFullName) {
  throw new $c_jl_ClassCastException(
    instance + \" is not an instance of \" + classFullName);
}
function $throwArrayCastException(instance, classArrayEncodedName, depth) {
  throw new $c_jl_ClassCastException(
    instance + \" is not an instance of \" + classArrayEncodedName);
}
///INSERT DECLARE TYPE DATA HERE///
///INSERT DECLARE MODULES HERE///
///INSERT IS AND AS FUNCTIONS HERE///
///INSERT CLASSES HERE///
///INSERT CREATE TYPE DATA HERE///
///INSERT EXPORTS HERE///
///THE END///";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strong_stand_in_has_all_markers_in_order() {
        let mut last = 0;
        for marker in SPLICE_MARKERS {
            let pos = STRONG_MODE_CORE_JS_LIB[last..]
                .find(marker)
                .unwrap_or_else(|| panic!("marker {marker} missing or out of order"));
            last += pos;
        }
    }

    #[test]
    fn test_core_lib_declares_env_fields() {
        for field in ["d:", "c:", "h:", "n:", "m:", "s:", "f:", "e:"] {
            assert!(CORE_JS_LIB.contains(field), "missing field {field}");
        }
        assert!(CORE_JS_LIB.contains("expandSubtypeArray"));
    }
}
