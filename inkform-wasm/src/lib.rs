use wasm_bindgen::prelude::*;
mod api;
pub use api::{classify, classify_res, fingerprint, fingerprint_res, set_panic_hook};
mod error;
mod interop;

#[wasm_bindgen]
pub struct Sketch { pub(crate) inner: inkform::Sketch }

impl Sketch {
    pub fn rs_new() -> Sketch { Sketch { inner: inkform::Sketch::new() } }
    pub fn rs_component_count(&self) -> usize { self.inner.components().len() }
}
