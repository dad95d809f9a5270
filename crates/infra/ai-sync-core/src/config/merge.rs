//! RFC 7396 JSON merge patch, used to layer the local config over the global one.

use serde_json::Value;

/// Apply `patch` onto `target` in place.
///
/// Objects merge key by key, `null` removes a key, anything else replaces.
pub fn merge_patch(target: &mut Value, patch: Value) {
    let Value::Object(patch_map) = patch else {
        *target = patch;
        return;
    };
    if !target.is_object() {
        *target = Value::Object(serde_json::Map::new());
    }
    let Value::Object(target_map) = target else {
        return;
    };
    for (key, value) in patch_map {
        if value.is_null() {
            target_map.remove(&key);
        } else {
            merge_patch(target_map.entry(key).or_insert(Value::Null), value);
        }
    }
}
