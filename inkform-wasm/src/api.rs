use crate::Sketch;
use js_sys::Float64Array;
use wasm_bindgen::prelude::*;
type JsValue = wasm_bindgen::JsValue;
use crate::error;
use crate::interop::{points_from, to_js};
use inkform::Library;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Stroke fingerprint, or null for malformed input.
#[wasm_bindgen]
pub fn fingerprint(points: &Float64Array) -> JsValue {
    match points_from(points) {
        Ok(pts) => to_js(&inkform::extract_fingerprint(&pts)),
        Err(_) => JsValue::NULL,
    }
}
#[wasm_bindgen]
pub fn fingerprint_res(points: &Float64Array) -> JsValue {
    match points_from(points) {
        Ok(pts) => error::ok(to_js(&inkform::extract_fingerprint(&pts))),
        Err(at) => error::invalid_points(at),
    }
}

/// Built-in classification only; user primitives need a session library.
#[wasm_bindgen]
pub fn classify(points: &Float64Array) -> JsValue {
    match points_from(points) {
        Ok(pts) => to_js(&inkform::classify(&inkform::extract_fingerprint(&pts), &pts)),
        Err(_) => JsValue::NULL,
    }
}
#[wasm_bindgen]
pub fn classify_res(points: &Float64Array) -> JsValue {
    match points_from(points) {
        Ok(pts) => error::ok(to_js(&inkform::classify(&inkform::extract_fingerprint(&pts), &pts))),
        Err(at) => error::invalid_points(at),
    }
}

#[wasm_bindgen]
impl Sketch {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Sketch {
        crate::Sketch::rs_new()
    }
    pub fn component_count(&self) -> u32 {
        self.rs_component_count() as u32
    }
    pub fn selected(&self) -> Option<u32> {
        self.inner.selected().map(|i| i as u32)
    }

    // Strokes
    pub fn add_stroke(&mut self, points: &Float64Array) -> JsValue {
        match points_from(points) {
            Ok(pts) => to_js(self.inner.add_stroke(pts)),
            Err(_) => JsValue::NULL,
        }
    }
    pub fn add_stroke_res(&mut self, points: &Float64Array) -> JsValue {
        match points_from(points) {
            Ok(pts) => error::ok(to_js(self.inner.add_stroke(pts))),
            Err(at) => error::invalid_points(at),
        }
    }
    pub fn accept(&mut self, kind: &str) -> bool {
        self.inner.accept_suggestion(kind).is_ok()
    }
    pub fn accept_res(&mut self, kind: &str) -> JsValue {
        match self.inner.accept_suggestion(kind) {
            Ok(m) => error::ok(to_js(m)),
            Err(e) => error::sketch(&e),
        }
    }
    pub fn reject(&mut self) -> bool {
        self.inner.reject_suggestion().is_ok()
    }
    pub fn reject_res(&mut self) -> JsValue {
        match self.inner.reject_suggestion() {
            Ok(m) => error::ok(to_js(m)),
            Err(e) => error::sketch(&e),
        }
    }
    pub fn remove(&mut self, index: u32) -> bool {
        self.inner.remove_component(index as usize).is_ok()
    }
    pub fn remove_res(&mut self, index: u32) -> JsValue {
        match self.inner.remove_component(index as usize) {
            Ok(m) => error::ok(to_js(m)),
            Err(e) => error::sketch(&e),
        }
    }
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    // Views
    pub fn suggestions(&self) -> JsValue {
        to_js(self.inner.suggestions())
    }
    pub fn matches(&self) -> JsValue {
        to_js(self.inner.composition_matches())
    }
    pub fn components(&self) -> JsValue {
        to_js(self.inner.components())
    }
    pub fn spatial_graph(&self) -> JsValue {
        to_js(&self.inner.spatial_graph())
    }

    // Library
    pub fn save(&mut self, name: &str) -> Option<String> {
        self.inner.save_to_library_at(name, Some(js_sys::Date::now() as u64)).ok()
    }
    pub fn save_res(&mut self, name: &str) -> JsValue {
        match self.inner.save_to_library_at(name, Some(js_sys::Date::now() as u64)) {
            Ok(key) => error::ok(JsValue::from_str(&key)),
            Err(e) => error::library(&e),
        }
    }
    pub fn delete(&mut self, key: &str) -> bool {
        self.inner.delete_from_library(key).is_ok()
    }
    pub fn delete_res(&mut self, key: &str) -> JsValue {
        match self.inner.delete_from_library(key) {
            Ok(item) => error::ok(to_js(&item)),
            Err(e) => error::library(&e),
        }
    }
    pub fn library_json(&self) -> String {
        self.inner.library().to_json_string()
    }
    pub fn load_library_json(&mut self, json: &str) -> bool {
        match Library::from_json_str(json) {
            Ok(lib) => {
                self.inner.set_library(lib);
                true
            }
            Err(_) => false,
        }
    }
    pub fn load_library_json_res(&mut self, json: &str) -> JsValue {
        match Library::from_json_str(json) {
            Ok(lib) => error::ok(to_js(self.inner.set_library(lib))),
            Err(e) => error::library(&e),
        }
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        web_sys::console::log_1(&JsValue::from_str(if verbose { "inkform: verbose on" } else { "inkform: verbose off" }));
        self.inner.set_verbose(verbose);
    }
}
