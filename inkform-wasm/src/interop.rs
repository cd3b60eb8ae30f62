use inkform::Point;
use js_sys::{Float64Array, Object, Reflect};
use serde::Serialize;
use wasm_bindgen::JsValue;

pub fn new_obj() -> Object { Object::new() }
pub fn set_kv(obj: &Object, k: &str, v: &JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(k), v);
}
/// Serializes plain data; maps become JS objects so keyed results read naturally.
pub fn to_js<T: Serialize + ?Sized>(v: &T) -> JsValue {
    let ser = serde_wasm_bindgen::Serializer::new().serialize_maps_as_objects(true);
    v.serialize(&ser).unwrap_or(JsValue::NULL)
}
/// Interleaved `[x0, y0, x1, y1, ...]` into points. `Err` carries the offending
/// position: the length for an odd array, else the first non-finite index.
pub fn points_from(arr: &Float64Array) -> Result<Vec<Point>, usize> {
    let flat = arr.to_vec();
    if flat.len() % 2 != 0 { return Err(flat.len()); }
    if let Some(i) = flat.iter().position(|v| !v.is_finite()) { return Err(i); }
    Ok(flat.chunks_exact(2).map(|xy| Point::new(xy[0], xy[1])).collect())
}
