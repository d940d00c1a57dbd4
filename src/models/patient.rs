use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{Gender, PatientStatus};

/// Patient document: demographics, clinical intake, and assignment.
///
/// Wire names are camelCase to match the clinic REST API. Optional
/// sub-objects (attorney) are absent when not on file, never empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub emergency_contact: EmergencyContact,
    #[serde(default)]
    pub insurance_info: InsuranceInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attorney: Option<Attorney>,
    #[serde(default)]
    pub medical_history: MedicalHistory,
    // Older patient documents predate the subjective intake section.
    #[serde(default)]
    pub subjective: SubjectiveIntake,
    pub assigned_doctor: Uuid,
    pub status: PatientStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyContact {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub relationship: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceInfo {
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub policy_number: String,
    #[serde(default)]
    pub group_number: String,
    #[serde(default)]
    pub primary_insured: String,
}

/// Legal representation for injury cases. Only persisted when at least
/// one leaf field is non-blank (see `form::clean`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attorney {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub firm: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

/// Freeform ordered lists, one per history category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalHistory {
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub surgeries: Vec<String>,
    #[serde(default)]
    pub family_history: Vec<String>,
}

/// Patient-reported intake captured at registration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectiveIntake {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub physical: Vec<String>,
    #[serde(default)]
    pub sleep: Vec<String>,
    #[serde(default)]
    pub cognitive: Vec<String>,
    #[serde(default)]
    pub digestive: Vec<String>,
    #[serde(default)]
    pub emotional: Vec<String>,
    #[serde(default)]
    pub body_part: Vec<String>,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub quality: Vec<String>,
    #[serde(default)]
    pub timing: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub exacerbated_by: Vec<String>,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub radiating_to: String,
    #[serde(default)]
    pub radiating_right: bool,
    #[serde(default)]
    pub radiating_left: bool,
    #[serde(default)]
    pub sciatica_right: bool,
    #[serde(default)]
    pub sciatica_left: bool,
}
