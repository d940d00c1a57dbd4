//! Dot-path mutation over a JSON draft.
//!
//! Field names arrive as dot-paths (`attorney.address.street`,
//! `restrictions.liftingLimitLbs`); intermediate objects are created on
//! demand. Checkbox groups are ordered-unique string lists: insertion
//! order is preserved for display but carries no meaning.

use serde_json::{Map, Value};

/// Set a scalar at a dot-path, creating intermediate objects as needed.
/// A non-object intermediate is replaced by an object, matching the
/// form's "initialize if absent" behavior.
pub fn set_path(root: &mut Value, path: &str, value: Value) {
    let mut current = root;
    let mut parts = path.split('.').peekable();

    while let Some(part) = parts.next() {
        if parts.peek().is_none() {
            match current {
                Value::Object(map) => {
                    map.insert(part.to_string(), value);
                }
                other => {
                    let mut map = Map::new();
                    map.insert(part.to_string(), value);
                    *other = Value::Object(map);
                }
            }
            return;
        }

        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        let map = match current.as_object_mut() {
            Some(map) => map,
            None => return,
        };
        let entry = map.entry(part.to_string()).or_insert(Value::Null);
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        current = entry;
    }
}

/// Look up a value at a dot-path.
pub fn get_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for part in path.split('.') {
        current = current.get(part)?;
    }
    Some(current)
}

/// Toggle membership of `item` in the string list at `path`. Absent or
/// non-array targets become a fresh list holding `item`.
pub fn toggle_in_list(root: &mut Value, path: &str, item: &str) {
    let existing = match get_path(root, path) {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    };

    let updated: Vec<Value> = if existing.iter().any(|v| v.as_str() == Some(item)) {
        existing.into_iter().filter(|v| v.as_str() != Some(item)).collect()
    } else {
        let mut items = existing;
        items.push(Value::String(item.to_string()));
        items
    };

    set_path(root, path, Value::Array(updated));
}

/// Append an empty slot to the array-of-record field at `path`.
pub fn push_entry(root: &mut Value, path: &str) {
    let mut items = match get_path(root, path) {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    };
    items.push(Value::String(String::new()));
    set_path(root, path, Value::Array(items));
}

/// Overwrite the entry at `index`; out-of-range writes are ignored.
pub fn set_entry(root: &mut Value, path: &str, index: usize, value: Value) {
    if let Some(Value::Array(items)) = get_path_mut(root, path) {
        if let Some(slot) = items.get_mut(index) {
            *slot = value;
        }
    }
}

/// Delete the entry at `index`, shifting the rest down.
pub fn remove_entry(root: &mut Value, path: &str, index: usize) {
    if let Some(Value::Array(items)) = get_path_mut(root, path) {
        if index < items.len() {
            items.remove(index);
        }
    }
}

fn get_path_mut<'a>(root: &'a mut Value, path: &str) -> Option<&'a mut Value> {
    let mut current = root;
    for part in path.split('.') {
        current = current.get_mut(part)?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_scalar_creates_intermediate_objects() {
        let mut draft = json!({});
        set_path(&mut draft, "attorney.address.street", json!("12 Elm St"));
        assert_eq!(draft["attorney"]["address"]["street"], "12 Elm St");
    }

    #[test]
    fn set_scalar_replaces_non_object_intermediate() {
        let mut draft = json!({ "restrictions": "" });
        set_path(&mut draft, "restrictions.liftingLimitLbs", json!(20));
        assert_eq!(draft["restrictions"]["liftingLimitLbs"], 20);
    }

    #[test]
    fn toggle_twice_restores_contents_and_order() {
        let mut draft = json!({ "physiotherapy": ["Ultrasound", "EMS", "Infrared"] });
        let before = draft.clone();

        toggle_in_list(&mut draft, "physiotherapy", "Paraffin Wax");
        assert_eq!(
            draft["physiotherapy"],
            json!(["Ultrasound", "EMS", "Infrared", "Paraffin Wax"])
        );

        toggle_in_list(&mut draft, "physiotherapy", "Paraffin Wax");
        assert_eq!(draft, before);
    }

    #[test]
    fn toggle_removes_from_middle_preserving_order() {
        let mut draft = json!({ "imaging": { "xray": ["C/S", "T/S", "L/S"] } });
        toggle_in_list(&mut draft, "imaging.xray", "T/S");
        assert_eq!(draft["imaging"]["xray"], json!(["C/S", "L/S"]));
    }

    #[test]
    fn toggle_on_absent_path_creates_singleton_list() {
        let mut draft = json!({});
        toggle_in_list(&mut draft, "nerveStudy", "EMG/NCV upper");
        assert_eq!(draft["nerveStudy"], json!(["EMG/NCV upper"]));
    }

    #[test]
    fn entry_ops_append_overwrite_and_shift() {
        let mut draft = json!({ "medicalHistory": { "allergies": ["Penicillin"] } });

        push_entry(&mut draft, "medicalHistory.allergies");
        set_entry(&mut draft, "medicalHistory.allergies", 1, json!("Latex"));
        assert_eq!(draft["medicalHistory"]["allergies"], json!(["Penicillin", "Latex"]));

        remove_entry(&mut draft, "medicalHistory.allergies", 0);
        assert_eq!(draft["medicalHistory"]["allergies"], json!(["Latex"]));
    }

    #[test]
    fn out_of_range_entry_ops_are_ignored() {
        let mut draft = json!({ "medicalHistory": { "surgeries": [] } });
        set_entry(&mut draft, "medicalHistory.surgeries", 3, json!("x"));
        remove_entry(&mut draft, "medicalHistory.surgeries", 3);
        assert_eq!(draft["medicalHistory"]["surgeries"], json!([]));
    }
}
