use crate::interop::{new_obj, set_kv};
use inkform::{LibraryError, SketchError};
use wasm_bindgen::prelude::*;

pub fn ok(v: JsValue) -> JsValue {
    let o = new_obj();
    set_kv(&o, "ok", &JsValue::from_bool(true));
    set_kv(&o, "value", &v);
    o.into()
}

pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let root = new_obj();
    set_kv(&root, "ok", &JsValue::from_bool(false));
    let e = new_obj();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    if let Some(d) = data { set_kv(&e, "data", &d); }
    set_kv(&root, "error", &e.into());
    root.into()
}

#[inline]
pub fn invalid_points(at: usize) -> JsValue {
    let d = new_obj(); set_kv(&d, "at", &JsValue::from_f64(at as f64));
    err("invalid_points", "points must be finite [x, y] pairs", Some(d.into()))
}

pub fn library(e: &LibraryError) -> JsValue {
    let key = match e {
        LibraryError::NameExists { key } | LibraryError::NotFound { key } | LibraryError::BuiltinProtected { key } => Some(key),
        _ => None,
    };
    let data = key.map(|k| {
        let d = new_obj(); set_kv(&d, "key", &JsValue::from_str(k));
        JsValue::from(d)
    });
    err(e.code(), e.to_string(), data)
}

pub fn sketch(e: &SketchError) -> JsValue {
    let data = match e {
        SketchError::InvalidComponent { index } => {
            let d = new_obj(); set_kv(&d, "index", &JsValue::from_f64(*index as f64));
            Some(d.into())
        }
        SketchError::NoSelection => None,
    };
    err(e.code(), e.to_string(), data)
}
