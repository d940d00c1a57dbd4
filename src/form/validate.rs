//! Client-side required-field validation, run before any network call.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use super::path::get_path;
use super::FormKind;

/// A field-level validation failure, attached inline by the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: &str) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email regex"))
}

fn phone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9+()./\-\s]{7,}$").expect("phone regex"))
}

fn str_at<'a>(draft: &'a Value, path: &str) -> &'a str {
    get_path(draft, path).and_then(Value::as_str).unwrap_or_default()
}

fn is_blank(draft: &Value, path: &str) -> bool {
    match get_path(draft, path) {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Validate a draft for the given form kind. Empty result means the
/// submission may proceed.
pub fn validate(kind: FormKind, draft: &Value) -> Vec<FieldError> {
    match kind {
        FormKind::Patient => validate_patient(draft),
        FormKind::InitialVisit => validate_initial_visit(draft),
        FormKind::FollowupVisit => validate_followup_visit(draft),
        FormKind::DischargeVisit => Vec::new(),
    }
}

fn validate_patient(draft: &Value) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if is_blank(draft, "firstName") {
        errors.push(FieldError::new("firstName", "First name is required"));
    }
    if is_blank(draft, "lastName") {
        errors.push(FieldError::new("lastName", "Last name is required"));
    }
    if is_blank(draft, "dateOfBirth") {
        errors.push(FieldError::new("dateOfBirth", "Date of birth is required"));
    }

    if is_blank(draft, "email") {
        errors.push(FieldError::new("email", "Email is required"));
    } else if !email_re().is_match(str_at(draft, "email").trim()) {
        errors.push(FieldError::new("email", "Email is invalid"));
    }

    if is_blank(draft, "phone") {
        errors.push(FieldError::new("phone", "Phone number is required"));
    } else if !phone_re().is_match(str_at(draft, "phone").trim()) {
        errors.push(FieldError::new("phone", "Phone number is invalid"));
    }

    if is_blank(draft, "assignedDoctor") {
        errors.push(FieldError::new("assignedDoctor", "Please assign a doctor"));
    }

    errors
}

fn validate_initial_visit(draft: &Value) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if is_blank(draft, "chiefComplaint") {
        errors.push(FieldError::new("chiefComplaint", "Chief complaint is required"));
    }
    errors
}

fn validate_followup_visit(draft: &Value) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if is_blank(draft, "previousVisit") {
        errors.push(FieldError::new("previousVisit", "Please select a previous visit"));
    }
    errors
}
