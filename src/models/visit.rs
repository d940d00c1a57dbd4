use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::VisitType;

// ─── Fixed vocabularies (exam & treatment plan sheet) ─────────────────────────

pub const SPINE_AND_EXTREMITY_REGIONS: &[&str] = &[
    "Cervical Spine",
    "Thoracic Spine",
    "Lumbar Spine",
    "Sacroiliac Spine",
    "Hip R / L",
    "Knee (Patella) R / L",
    "Ankle R / L",
    "Shoulder (GHJ) R / L",
    "Elbow R / L",
    "Wrist Carpals R / L",
];

pub const PHYSIOTHERAPY_MODALITIES: &[&str] = &[
    "Hot Pack/Cold Pack",
    "Ultrasound",
    "EMS",
    "E-Stim",
    "Therapeutic Exercises",
    "NMR",
    "Orthion Bed",
    "Mechanical Traction",
    "Paraffin Wax",
    "Infrared",
];

pub const REFERRAL_SPECIALTIES: &[&str] = &["Orthopedist", "Neurologist", "Pain Management"];

pub const IMAGING_REGIONS: &[&str] = &[
    "C/S",
    "T/S",
    "L/S",
    "Sacroiliac Joint R",
    "Sacroiliac Joint L",
    "Hip R",
    "Hip L",
    "Knee R",
    "Knee L",
    "Ankle R",
    "Ankle L",
    "Shoulder R",
    "Shoulder L",
    "Elbow R",
    "Elbow L",
    "Wrist R",
    "Wrist L",
];

pub const NERVE_STUDIES: &[&str] = &["EMG/NCV upper", "EMG/NCV lower"];

pub const PROGNOSIS_OPTIONS: &[&str] = &["Excellent", "Good", "Fair", "Guarded", "Poor"];

// ─── Visit document ───────────────────────────────────────────────────────────

/// A clinical encounter. The base fields are shared by every variant;
/// the variant-specific field set lives in [`VisitDetail`], discriminated
/// by the `visitType` tag. A document with an unrecognized tag fails
/// deserialization; it is rejected at the boundary, never rendered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub patient: Uuid,
    pub doctor: Uuid,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Generated narrative, patched onto the visit after creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_narrative: Option<String>,
    #[serde(flatten)]
    pub detail: VisitDetail,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Visit {
    pub fn visit_type(&self) -> VisitType {
        self.detail.visit_type()
    }
}

/// Variant field sets, tagged by `visitType`. Fields belonging to a
/// different variant are structurally absent, not empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "visitType")]
pub enum VisitDetail {
    #[serde(rename = "initial")]
    Initial(InitialVisit),
    #[serde(rename = "followup")]
    Followup(FollowupVisit),
    #[serde(rename = "discharge")]
    Discharge(DischargeVisit),
}

impl VisitDetail {
    pub fn visit_type(&self) -> VisitType {
        match self {
            Self::Initial(_) => VisitType::Initial,
            Self::Followup(_) => VisitType::Followup,
            Self::Discharge(_) => VisitType::Discharge,
        }
    }
}

/// Exam & treatment plan recorded at the first encounter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialVisit {
    pub chief_complaint: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chiropractic_adjustment: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chiropractic_other: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub acupuncture: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acupuncture_other: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub physiotherapy: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rehabilitation_exercises: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_frequency: Option<DurationFrequency>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub referrals: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imaging: Option<ImagingOrders>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostic_ultrasound: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nerve_study: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrictions: Option<Restrictions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disability_duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_notes: Option<String>,
}

/// Re-evaluation exam. `previous_visit` establishes the visit chain;
/// the reference is advisory (presence validated, chronology not).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowupVisit {
    pub previous_visit: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub areas: Option<String>,
    #[serde(default)]
    pub areas_improving: bool,
    #[serde(default)]
    pub areas_exacerbated: bool,
    #[serde(default)]
    pub areas_same: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muscle_palpation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pain_radiating: Option<String>,
    #[serde(default)]
    pub rom_wnl_no_pain: bool,
    #[serde(default)]
    pub rom_wnl_with_pain: bool,
    #[serde(default)]
    pub rom_improved: bool,
    #[serde(default)]
    pub rom_decreased: bool,
    #[serde(default)]
    pub rom_same: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orthos: Option<OrthoTests>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activities_cause_pain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activities_cause_pain_other: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treatment_plan: Option<TreatmentPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_response: Option<OverallResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrals: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostic_study: Option<DiagnosticStudy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_care: Option<String>,
}

/// Final exam closing the episode of care.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DischargeVisit {
    #[serde(default)]
    pub areas_improving: bool,
    #[serde(default)]
    pub areas_exacerbated: bool,
    #[serde(default)]
    pub areas_same: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muscle_palpation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pain_radiating: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rom_percent: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orthos: Option<OrthoTests>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activities_cause_pain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prognosis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostic_study: Option<DiagnosticStudy>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub future_medical_care: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub croft_criteria: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ama_disability: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub home_care: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrals_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_notes: Option<String>,
}

// ─── Shared sub-records ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationFrequency {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub times_per_week: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub re_eval_in_weeks: Option<u32>,
}

/// Ordered body regions per imaging modality.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagingOrders {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub xray: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mri: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ct: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restrictions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avoid_activity_weeks: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifting_limit_lbs: Option<u32>,
    #[serde(default)]
    pub avoid_prolonged_sitting: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrthoTests {
    #[serde(default)]
    pub tests: String,
    #[serde(default)]
    pub result: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentPlan {
    #[serde(default)]
    pub treatments: String,
    #[serde(default)]
    pub times_per_week: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallResponse {
    #[serde(default)]
    pub improving: bool,
    #[serde(default)]
    pub worse: bool,
    #[serde(default)]
    pub same: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticStudy {
    #[serde(default)]
    pub study: String,
    #[serde(default)]
    pub body_part: String,
    #[serde(default)]
    pub result: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_fields() -> serde_json::Value {
        serde_json::json!({
            "patient": "0b7b5c86-9a1d-4f3e-8f2a-6c5d4e3f2a1b",
            "doctor": "6dd7b9e4-2b8c-4a7e-9a61-1f2a3b4c5d6e",
            "date": "2026-02-10T18:30:00Z"
        })
    }

    #[test]
    fn initial_visit_dispatches_on_tag() {
        let mut doc = base_fields();
        doc["visitType"] = "initial".into();
        doc["chiefComplaint"] = "Lower back pain after rear-end collision".into();
        doc["chiropracticAdjustment"] = serde_json::json!(["Lumbar Spine", "Sacroiliac Spine"]);

        let visit: Visit = serde_json::from_value(doc).unwrap();
        assert_eq!(visit.visit_type(), VisitType::Initial);
        match &visit.detail {
            VisitDetail::Initial(iv) => {
                assert_eq!(iv.chief_complaint, "Lower back pain after rear-end collision");
                assert_eq!(iv.chiropractic_adjustment.len(), 2);
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn followup_requires_previous_visit() {
        let mut doc = base_fields();
        doc["visitType"] = "followup".into();
        doc["musclePalpation"] = "Tenderness L4-L5".into();

        let err = serde_json::from_value::<Visit>(doc).unwrap_err();
        assert!(err.to_string().contains("previousVisit"), "{err}");
    }

    #[test]
    fn unknown_discriminator_rejected() {
        let mut doc = base_fields();
        doc["visitType"] = "annual".into();
        assert!(serde_json::from_value::<Visit>(doc).is_err());
    }

    #[test]
    fn other_variant_fields_absent_in_serialization() {
        let visit = Visit {
            id: None,
            patient: Uuid::new_v4(),
            doctor: Uuid::new_v4(),
            date: Utc::now(),
            notes: None,
            ai_narrative: None,
            detail: VisitDetail::Discharge(DischargeVisit {
                areas_improving: true,
                prognosis: Some("Good".into()),
                ..Default::default()
            }),
            created_at: None,
            updated_at: None,
        };

        let doc = serde_json::to_value(&visit).unwrap();
        assert_eq!(doc["visitType"], "discharge");
        // No initial/follow-up leakage, and empty leaves are absent.
        assert!(doc.get("chiefComplaint").is_none());
        assert!(doc.get("previousVisit").is_none());
        assert!(doc.get("futureMedicalCare").is_none());
        assert!(doc.get("musclePalpation").is_none());
    }

    #[test]
    fn discharge_round_trip() {
        let mut doc = base_fields();
        doc["visitType"] = "discharge".into();
        doc["romPercent"] = 85.0.into();
        doc["futureMedicalCare"] = serde_json::json!(["Chiropractic PRN"]);
        doc["homeCare"] = serde_json::json!(["Stretching", "Heat therapy"]);

        let visit: Visit = serde_json::from_value(doc.clone()).unwrap();
        let out = serde_json::to_value(&visit).unwrap();
        assert_eq!(out["romPercent"], doc["romPercent"]);
        assert_eq!(out["homeCare"], doc["homeCare"]);
    }
}
