//! `FormController` owns one form's draft for its whole lifetime.
//!
//! The draft is shaped like the target document (camelCase wire names)
//! and mutated through dot-path operations; every mutation reschedules
//! the debounced auto-save. Submission validates, cleans, and hands the
//! payload to the API client; on failure the draft survives so the user
//! loses nothing. Must run inside a tokio runtime (the auto-save task
//! is spawned).

use std::sync::Arc;

use chrono::Local;
use serde_json::{json, Value};
use uuid::Uuid;

use super::autosave::Autosave;
use super::clean::clean;
use super::path;
use super::validate::{validate, FieldError};
use super::{FormError, FormKind};
use crate::api::EmrClient;
use crate::db::{DraftSlot, DraftStore};
use crate::models::{Patient, PatientStatus, VisitType};

/// What the form writes when submitted.
#[derive(Debug, Clone)]
pub enum FormTarget {
    CreatePatient,
    EditPatient { patient: Uuid },
    Visit { visit_type: VisitType, patient: Uuid, doctor: Uuid },
}

impl FormTarget {
    fn kind(&self) -> FormKind {
        match self {
            Self::CreatePatient | Self::EditPatient { .. } => FormKind::Patient,
            Self::Visit { visit_type, .. } => match visit_type {
                VisitType::Initial => FormKind::InitialVisit,
                VisitType::Followup => FormKind::FollowupVisit,
                VisitType::Discharge => FormKind::DischargeVisit,
            },
        }
    }

    fn slot_key(&self) -> String {
        match self {
            Self::CreatePatient => self.kind().slot_key("new"),
            Self::EditPatient { patient } => self.kind().slot_key(&patient.to_string()),
            Self::Visit { patient, .. } => self.kind().slot_key(&patient.to_string()),
        }
    }
}

/// Result of a successful submission; the view navigates to the
/// patient's detail page.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub record_id: Uuid,
    pub visit_id: Option<Uuid>,
}

pub struct FormController {
    target: FormTarget,
    slot_key: String,
    draft: Value,
    errors: Vec<FieldError>,
    autosave: Autosave,
    store: Arc<DraftStore>,
    submitting: bool,
}

impl FormController {
    /// New patient intake form. `assigned_doctor` is preset for
    /// non-admin users, who may only register their own patients.
    pub fn create_patient(store: Arc<DraftStore>, assigned_doctor: Option<Uuid>) -> Self {
        Self::with_draft(store, FormTarget::CreatePatient, patient_template(assigned_doctor))
    }

    /// Edit form over an existing patient document.
    pub fn edit_patient(
        store: Arc<DraftStore>,
        id: Uuid,
        patient: &Patient,
    ) -> Result<Self, FormError> {
        let draft = serde_json::to_value(patient)?;
        Ok(Self::with_draft(store, FormTarget::EditPatient { patient: id }, draft))
    }

    /// Visit documentation form of the given type for a patient.
    pub fn visit(
        store: Arc<DraftStore>,
        visit_type: VisitType,
        patient: Uuid,
        doctor: Uuid,
    ) -> Self {
        let draft = visit_template(visit_type);
        Self::with_draft(store, FormTarget::Visit { visit_type, patient, doctor }, draft)
    }

    fn with_draft(store: Arc<DraftStore>, target: FormTarget, draft: Value) -> Self {
        let slot_key = target.slot_key();
        let autosave = Autosave::new(Arc::clone(&store), slot_key.clone());
        Self { target, slot_key, draft, errors: Vec::new(), autosave, store, submitting: false }
    }

    pub fn kind(&self) -> FormKind {
        self.target.kind()
    }

    pub fn draft(&self) -> &Value {
        &self.draft
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.errors.iter().find(|e| e.field == field).map(|e| e.message.as_str())
    }

    pub fn value_at(&self, field: &str) -> Option<&Value> {
        path::get_path(&self.draft, field)
    }

    // ─── Mutations — each one reschedules the auto-save ───────────────────────

    pub fn set_field(&mut self, field: &str, value: Value) {
        path::set_path(&mut self.draft, field, value);
        self.after_edit(field);
    }

    pub fn set_text(&mut self, field: &str, text: &str) {
        self.set_field(field, Value::String(text.to_string()));
    }

    pub fn set_flag(&mut self, field: &str, checked: bool) {
        self.set_field(field, Value::Bool(checked));
    }

    pub fn set_number(&mut self, field: &str, value: f64) {
        self.set_field(field, json!(value));
    }

    /// Toggle a checkbox-group value in or out of its list.
    pub fn toggle_group(&mut self, field: &str, item: &str) {
        path::toggle_in_list(&mut self.draft, field, item);
        self.after_edit(field);
    }

    /// Append an empty slot to an array-of-record field.
    pub fn add_entry(&mut self, field: &str) {
        path::push_entry(&mut self.draft, field);
        self.after_edit(field);
    }

    pub fn set_entry(&mut self, field: &str, index: usize, text: &str) {
        path::set_entry(&mut self.draft, field, index, Value::String(text.to_string()));
        self.after_edit(field);
    }

    /// Delete by index, shifting later entries down.
    pub fn remove_entry(&mut self, field: &str, index: usize) {
        path::remove_entry(&mut self.draft, field, index);
        self.after_edit(field);
    }

    fn after_edit(&mut self, field: &str) {
        self.errors.retain(|e| e.field != field);
        self.autosave.schedule(&self.draft);
    }

    // ─── Saved-draft recovery ─────────────────────────────────────────────────

    /// The slot to offer for resume when the form opens, if any.
    pub fn saved_draft(&self) -> Result<Option<DraftSlot>, FormError> {
        Ok(self.store.load(&self.slot_key)?)
    }

    /// Replace the draft with the saved slot. Returns false when there
    /// was nothing to resume.
    pub fn resume_saved(&mut self) -> Result<bool, FormError> {
        match self.store.load(&self.slot_key)? {
            Some(slot) => {
                self.draft = serde_json::from_str(&slot.payload)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn discard_saved(&mut self) -> Result<(), FormError> {
        self.autosave.cancel();
        Ok(self.store.clear(&self.slot_key)?)
    }

    // ─── Submission ───────────────────────────────────────────────────────────

    /// Validated, cleaned wire payload, with the discriminator and
    /// document references injected for visit forms.
    pub fn assemble_payload(&self) -> Value {
        let mut payload = clean(self.kind(), &self.draft);

        match &self.target {
            FormTarget::CreatePatient | FormTarget::EditPatient { .. } => {
                if payload.get("status").is_none() {
                    payload["status"] = json!(PatientStatus::Active);
                }
            }
            FormTarget::Visit { visit_type, patient, doctor } => {
                payload["visitType"] = json!(visit_type);
                payload["patient"] = json!(patient);
                payload["doctor"] = json!(doctor);
            }
        }

        payload
    }

    /// Validate, clean, and send. On validation failure no network call
    /// is made; on transport/server failure the draft and its slot are
    /// retained for retry.
    pub async fn submit(&mut self, client: &EmrClient) -> Result<SubmitOutcome, FormError> {
        if self.submitting {
            return Err(FormError::AlreadySubmitting);
        }

        self.errors = validate(self.kind(), &self.draft);
        if !self.errors.is_empty() {
            return Err(FormError::Validation(self.errors.clone()));
        }

        // Set synchronously before the first await; the only guard
        // against a double submit.
        self.submitting = true;
        let payload = self.assemble_payload();
        let result = self.dispatch(client, &payload).await;
        self.submitting = false;

        match result {
            Ok(outcome) => {
                self.autosave.cancel();
                self.store.clear(&self.slot_key)?;
                Ok(outcome)
            }
            Err(e) => {
                tracing::warn!(error = %e, "form submission failed; draft retained");
                Err(FormError::Api(e))
            }
        }
    }

    async fn dispatch(
        &self,
        client: &EmrClient,
        payload: &Value,
    ) -> Result<SubmitOutcome, crate::api::ApiError> {
        match &self.target {
            FormTarget::CreatePatient => {
                let saved = client.create_patient(payload).await?;
                let record_id = saved.id.ok_or(crate::api::ApiError::Unexpected {
                    status: 200,
                    message: "created patient document has no id".into(),
                })?;
                Ok(SubmitOutcome { record_id, visit_id: None })
            }
            FormTarget::EditPatient { patient } => {
                client.update_patient(*patient, payload).await?;
                Ok(SubmitOutcome { record_id: *patient, visit_id: None })
            }
            FormTarget::Visit { visit_type, patient, .. } => {
                let saved = client.create_visit(*patient, payload).await?;

                self.run_narrative_flow(client, payload, saved.id).await;

                if *visit_type == VisitType::Discharge {
                    // UI-enforced lifecycle side effect, not transactional.
                    if let Err(e) =
                        client.update_patient_status(*patient, PatientStatus::Discharged).await
                    {
                        tracing::warn!(error = %e, "failed to mark patient discharged");
                    }
                }

                Ok(SubmitOutcome { record_id: *patient, visit_id: saved.id })
            }
        }
    }

    /// Generate a narrative from the visit-shaped payload and patch it
    /// onto the saved visit. Fire-and-forget: failure never fails the
    /// submission that already succeeded.
    async fn run_narrative_flow(&self, client: &EmrClient, payload: &Value, visit_id: Option<Uuid>) {
        let narrative = match client.generate_narrative(payload).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "narrative generation failed");
                return;
            }
        };

        match visit_id {
            Some(visit_id) => {
                if let Err(e) = client.attach_narrative(visit_id, &narrative).await {
                    tracing::warn!(error = %e, "failed to attach narrative to visit");
                }
            }
            None => tracing::warn!("saved visit has no id; narrative not attached"),
        }
    }
}

// ─── Draft templates (same defaults as the entry forms) ───────────────────────

fn patient_template(assigned_doctor: Option<Uuid>) -> Value {
    json!({
        "firstName": "",
        "lastName": "",
        "dateOfBirth": "",
        "gender": "male",
        "phone": "",
        "email": "",
        "status": "active",
        "assignedDoctor": assigned_doctor.map(|id| id.to_string()).unwrap_or_default(),
        "address": { "street": "", "city": "", "state": "", "zipCode": "", "country": "USA" },
        "emergencyContact": { "name": "", "relationship": "", "phone": "" },
        "insuranceInfo": {
            "provider": "", "policyNumber": "", "groupNumber": "", "primaryInsured": ""
        },
        "medicalHistory": {
            "allergies": [""],
            "medications": [""],
            "conditions": [""],
            "surgeries": [""],
            "familyHistory": [""]
        },
        "subjective": {
            "fullName": "",
            "date": Local::now().format("%Y-%m-%d").to_string(),
            "physical": [], "sleep": [], "cognitive": [], "digestive": [], "emotional": [],
            "bodyPart": [],
            "severity": "",
            "quality": [],
            "timing": "",
            "context": "",
            "exacerbatedBy": [],
            "symptoms": [],
            "notes": "",
            "radiatingTo": "",
            "radiatingRight": false,
            "radiatingLeft": false,
            "sciaticaRight": false,
            "sciaticaLeft": false
        },
        "attorney": {
            "name": "", "firm": "", "phone": "", "email": "",
            "address": { "street": "", "city": "", "state": "", "zipCode": "" }
        }
    })
}

fn visit_template(visit_type: VisitType) -> Value {
    match visit_type {
        VisitType::Initial => json!({
            "chiefComplaint": "",
            "chiropracticAdjustment": [],
            "chiropracticOther": "",
            "acupuncture": [],
            "acupunctureOther": "",
            "physiotherapy": [],
            "rehabilitationExercises": [],
            "durationFrequency": { "timesPerWeek": null, "reEvalInWeeks": null },
            "referrals": [],
            "imaging": { "xray": [], "mri": [], "ct": [] },
            "diagnosticUltrasound": "",
            "nerveStudy": [],
            "restrictions": {
                "avoidActivityWeeks": null,
                "liftingLimitLbs": null,
                "avoidProlongedSitting": false
            },
            "disabilityDuration": "",
            "otherNotes": ""
        }),
        VisitType::Followup => json!({
            "previousVisit": "",
            "areas": "",
            "areasImproving": false,
            "areasExacerbated": false,
            "areasSame": false,
            "musclePalpation": "",
            "painRadiating": "",
            "romWnlNoPain": false,
            "romWnlWithPain": false,
            "romImproved": false,
            "romDecreased": false,
            "romSame": false,
            "orthos": { "tests": "", "result": "" },
            "activitiesCausePain": "",
            "activitiesCausePainOther": "",
            "treatmentPlan": { "treatments": "", "timesPerWeek": "" },
            "overallResponse": { "improving": false, "worse": false, "same": false },
            "referrals": "",
            "diagnosticStudy": { "study": "", "bodyPart": "", "result": "" },
            "homeCare": "",
            "notes": ""
        }),
        VisitType::Discharge => json!({
            "areasImproving": false,
            "areasExacerbated": false,
            "areasSame": false,
            "musclePalpation": "",
            "painRadiating": "",
            "romPercent": null,
            "orthos": { "tests": "", "result": "" },
            "activitiesCausePain": "",
            "prognosis": "",
            "diagnosticStudy": { "study": "", "bodyPart": "", "result": "" },
            "futureMedicalCare": [],
            "croftCriteria": "",
            "amaDisability": "",
            "homeCare": [],
            "referralsNotes": "",
            "otherNotes": ""
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RequestContext;

    fn store() -> Arc<DraftStore> {
        Arc::new(DraftStore::in_memory().unwrap())
    }

    // Unroutable on purpose: a test fails loudly if a network call is
    // ever attempted where none should be.
    fn offline_client() -> EmrClient {
        EmrClient::new(RequestContext::new("http://127.0.0.1:1"))
    }

    #[tokio::test(start_paused = true)]
    async fn patient_template_matches_intake_form_defaults() {
        let controller = FormController::create_patient(store(), None);
        let draft = controller.draft();

        assert_eq!(draft["gender"], "male");
        assert_eq!(draft["status"], "active");
        assert_eq!(draft["address"]["country"], "USA");
        assert_eq!(draft["medicalHistory"]["allergies"], json!([""]));
        assert_eq!(draft["attorney"]["name"], "");
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_submission_reports_fields_without_network() {
        let mut controller = FormController::create_patient(store(), None);
        controller.set_text("firstName", "Maria");

        // Offline client: reaching the network would surface a
        // Transport error instead of Validation.
        let err = controller.submit(&offline_client()).await.unwrap_err();
        let FormError::Validation(errors) = err else {
            panic!("expected validation failure");
        };

        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"lastName"));
        assert!(fields.contains(&"email"));
        assert!(!fields.contains(&"firstName"));
        assert_eq!(controller.field_error("email"), Some("Email is required"));
    }

    #[tokio::test(start_paused = true)]
    async fn editing_a_field_clears_its_inline_error() {
        let mut controller = FormController::create_patient(store(), None);
        let _ = controller.submit(&offline_client()).await;
        assert!(controller.field_error("email").is_some());

        controller.set_text("email", "maria@example.com");
        assert!(controller.field_error("email").is_none());
        assert!(controller.field_error("lastName").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_twice_restores_draft() {
        let mut controller =
            FormController::visit(store(), VisitType::Initial, Uuid::new_v4(), Uuid::new_v4());
        controller.toggle_group("chiropracticAdjustment", "Lumbar Spine");
        let before = controller.draft().clone();

        controller.toggle_group("chiropracticAdjustment", "Cervical Spine");
        controller.toggle_group("chiropracticAdjustment", "Cervical Spine");
        assert_eq!(controller.draft(), &before);
    }

    #[tokio::test(start_paused = true)]
    async fn history_entries_add_edit_remove() {
        let mut controller = FormController::create_patient(store(), None);
        controller.set_entry("medicalHistory.allergies", 0, "Penicillin");
        controller.add_entry("medicalHistory.allergies");
        controller.set_entry("medicalHistory.allergies", 1, "Latex");
        controller.remove_entry("medicalHistory.allergies", 0);

        assert_eq!(
            controller.value_at("medicalHistory.allergies").unwrap(),
            &json!(["Latex"])
        );
    }

    #[tokio::test(start_paused = true)]
    async fn assemble_payload_injects_visit_discriminator_and_refs() {
        let patient = Uuid::new_v4();
        let doctor = Uuid::new_v4();
        let mut controller = FormController::visit(store(), VisitType::Initial, patient, doctor);
        controller.set_text("chiefComplaint", "Neck pain");
        controller.toggle_group("imaging.xray", "C/S");

        let payload = controller.assemble_payload();
        assert_eq!(payload["visitType"], "initial");
        assert_eq!(payload["patient"], patient.to_string());
        assert_eq!(payload["doctor"], doctor.to_string());
        assert_eq!(payload["imaging"]["xray"], json!(["C/S"]));
        // Template placeholders cleaned away.
        assert!(payload.get("chiropracticOther").is_none());
        assert!(payload.get("durationFrequency").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn assemble_payload_drops_blank_attorney() {
        let mut controller = FormController::create_patient(store(), None);
        controller.set_text("attorney.address.street", "400 Oceangate");

        // Identity fields all blank: the whole attorney block goes.
        let payload = controller.assemble_payload();
        assert!(payload.get("attorney").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn saved_draft_resume_round_trip() {
        let store = store();
        let patient = Uuid::new_v4();
        let doctor = Uuid::new_v4();

        {
            let mut controller =
                FormController::visit(Arc::clone(&store), VisitType::Followup, patient, doctor);
            controller.set_text("musclePalpation", "Tenderness L4-L5");
            tokio::time::sleep(super::super::autosave::DEFAULT_DEBOUNCE * 2).await;
            tokio::task::yield_now().await;
        }

        let mut reopened =
            FormController::visit(Arc::clone(&store), VisitType::Followup, patient, doctor);
        assert!(reopened.saved_draft().unwrap().is_some());
        assert!(reopened.resume_saved().unwrap());
        assert_eq!(reopened.value_at("musclePalpation").unwrap(), "Tenderness L4-L5");

        reopened.discard_saved().unwrap();
        assert!(reopened.saved_draft().unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_submission_keeps_the_draft_slot() {
        let store = store();
        let mut controller = FormController::create_patient(Arc::clone(&store), Some(Uuid::new_v4()));
        controller.set_text("firstName", "Maria");
        controller.set_text("lastName", "Lopez");
        controller.set_text("dateOfBirth", "1985-03-14");
        controller.set_text("email", "maria@example.com");
        controller.set_text("phone", "(562) 555-0101");
        tokio::time::sleep(super::super::autosave::DEFAULT_DEBOUNCE * 2).await;
        tokio::task::yield_now().await;

        let err = controller.submit(&offline_client()).await.unwrap_err();
        assert!(matches!(err, FormError::Api(_)));
        assert!(controller.saved_draft().unwrap().is_some());
    }
}
