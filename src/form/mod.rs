//! Form controllers: draft state, mutation, validation, cleaning,
//! auto-save, and submission to the persistence boundary.

pub mod autosave;
pub mod clean;
pub mod controller;
pub mod path;
pub mod validate;

pub use autosave::Autosave;
pub use controller::{FormController, FormTarget, SubmitOutcome};
pub use validate::FieldError;

use thiserror::Error;

use crate::api::ApiError;
use crate::db::DatabaseError;

/// Which form a draft slot belongs to. The slot prefix keys local
/// recovery storage together with the record id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Patient,
    InitialVisit,
    FollowupVisit,
    DischargeVisit,
}

impl FormKind {
    pub fn slot_prefix(&self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::InitialVisit => "initial_visit",
            Self::FollowupVisit => "followup_visit",
            Self::DischargeVisit => "discharge_visit",
        }
    }

    pub fn slot_key(&self, record_id: &str) -> String {
        format!("{}:{}", self.slot_prefix(), record_id)
    }
}

/// Errors surfaced by a form controller. Validation errors carry the
/// per-field messages the view renders inline; everything else is
/// terminal to the current submit and leaves the draft intact.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Draft serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("A submission is already in flight")]
    AlreadySubmitting,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_keys_scope_by_form_kind() {
        assert_eq!(FormKind::Patient.slot_key("new"), "patient:new");
        assert_eq!(
            FormKind::FollowupVisit.slot_key("0b7b5c86"),
            "followup_visit:0b7b5c86"
        );
    }
}
