//! Payload cleaning between validation and submission.
//!
//! Blank entries are stripped from freeform lists, optional nested
//! objects that cleaned down to nothing are removed entirely rather
//! than sent empty, and the date of birth is normalized to its
//! calendar day. Booleans and numbers always survive cleaning.

use chrono::{DateTime, NaiveDate};
use serde_json::Value;

use super::path::{get_path, set_path};
use super::FormKind;

/// Clean a draft for submission. The draft itself is left untouched;
/// the cleaned payload is what goes on the wire.
pub fn clean(kind: FormKind, draft: &Value) -> Value {
    let mut payload = draft.clone();
    match kind {
        FormKind::Patient => clean_patient(&mut payload),
        FormKind::InitialVisit | FormKind::FollowupVisit | FormKind::DischargeVisit => {
            clean_visit(&mut payload)
        }
    }
    prune_empty(&mut payload);
    payload
}

fn clean_patient(payload: &mut Value) {
    normalize_date_of_birth(payload);

    for category in ["allergies", "medications", "conditions", "surgeries", "familyHistory"] {
        strip_blank_entries(payload, &format!("medicalHistory.{category}"));
    }
    strip_blank_entries(payload, "subjective.bodyPart");

    clean_attorney(payload);
}

fn clean_visit(payload: &mut Value) {
    for list in [
        "chiropracticAdjustment",
        "acupuncture",
        "physiotherapy",
        "rehabilitationExercises",
        "referrals",
        "nerveStudy",
        "imaging.xray",
        "imaging.mri",
        "imaging.ct",
        "futureMedicalCare",
        "homeCare",
    ] {
        strip_blank_entries(payload, list);
    }
}

/// The attorney block is dropped outright when its identity fields are
/// all blank, regardless of any address content; a surviving attorney
/// loses an all-blank address.
fn clean_attorney(payload: &mut Value) {
    let has_identity = ["name", "firm", "phone", "email"].iter().any(|field| {
        get_path(payload, &format!("attorney.{field}"))
            .and_then(Value::as_str)
            .is_some_and(|s| !s.trim().is_empty())
    });

    let Some(root) = payload.as_object_mut() else { return };
    if !root.contains_key("attorney") {
        return;
    }

    if !has_identity {
        root.remove("attorney");
        return;
    }

    if let Some(attorney) = root.get_mut("attorney").and_then(Value::as_object_mut) {
        let address_blank = attorney
            .get("address")
            .and_then(Value::as_object)
            .map(|address| {
                address.values().all(|v| v.as_str().map(str::trim).unwrap_or_default().is_empty())
            })
            .unwrap_or(true);
        if address_blank {
            attorney.remove("address");
        }
    }
}

/// Normalize the date of birth to `YYYY-MM-DD`, keeping the same
/// calendar day whether the draft held a date or a full timestamp.
fn normalize_date_of_birth(payload: &mut Value) {
    let Some(raw) = get_path(payload, "dateOfBirth").and_then(Value::as_str) else {
        return;
    };
    let raw = raw.trim();

    let day = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()));

    if let Some(day) = day {
        set_path(payload, "dateOfBirth", Value::String(day.format("%Y-%m-%d").to_string()));
    }
}

fn strip_blank_entries(payload: &mut Value, path: &str) {
    let Some(Value::Array(items)) = get_path(payload, path) else { return };
    let kept: Vec<Value> = items
        .iter()
        .filter(|v| v.as_str().map(str::trim).map(|s| !s.is_empty()).unwrap_or(true))
        .cloned()
        .collect();
    set_path(payload, path, Value::Array(kept));
}

/// Recursively drop nulls, blank strings, empty arrays, and objects
/// that end up empty. Absence and irrelevance are the same thing on
/// the wire.
fn prune_empty(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for child in map.values_mut() {
                prune_empty(child);
            }
            map.retain(|_, v| !is_empty_leaf(v));
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                prune_empty(item);
            }
        }
        _ => {}
    }
}

fn is_empty_leaf(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
