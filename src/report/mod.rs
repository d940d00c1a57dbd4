//! Narrative report assembly.
//!
//! Three stages, each testable on its own: `project` turns documents
//! into titled sections, `layout` measures those sections into a page
//! plan, and `pdf` draws the plan. The page count is known before any
//! drawing starts, so every footer carries the final total.

pub mod layout;
pub mod pdf;
pub mod project;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("PDF generation failed: {0}")]
    Pdf(String),
    #[error("failed to write report file: {0}")]
    Io(#[from] std::io::Error),
}

pub use layout::{plan_report, ReportPlan};
pub use pdf::{export_pdf_to_file, render_report};
pub use project::{
    narrative_report_filename, narrative_sections, patient_summary_filename,
    patient_summary_sections, visit_report_filename, visit_report_sections, Field, Section,
};

use crate::models::{Patient, Visit};

/// Short summary sheet (demographics + medical history) as PDF bytes.
pub fn patient_summary_pdf(patient: &Patient) -> Result<Vec<u8>, ReportError> {
    let title = format!("Patient Summary — {}", patient.full_name());
    let plan = plan_report(&title, &patient_summary_sections(patient));
    render_report(&plan)
}

/// Standalone report for one visit as PDF bytes.
pub fn visit_report_pdf(patient: &Patient, visit: &Visit) -> Result<Vec<u8>, ReportError> {
    let title = format!("Visit Report — {}", patient.full_name());
    let plan = plan_report(&title, &visit_report_sections(patient, visit));
    render_report(&plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, PatientStatus};
    use chrono::NaiveDate;
    use uuid::Uuid;

    #[test]
    fn summary_pdf_renders_for_a_minimal_patient() {
        let patient = Patient {
            id: None,
            first_name: "Maria".into(),
            last_name: "Lopez".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1985, 3, 14).unwrap(),
            gender: Gender::Female,
            email: String::new(),
            phone: String::new(),
            address: Default::default(),
            emergency_contact: Default::default(),
            insurance_info: Default::default(),
            attorney: None,
            medical_history: Default::default(),
            subjective: Default::default(),
            assigned_doctor: Uuid::new_v4(),
            status: PatientStatus::Active,
            created_at: None,
            updated_at: None,
        };

        let bytes = patient_summary_pdf(&patient).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn visit_report_pdf_renders_one_visit() {
        let patient = Patient {
            id: None,
            first_name: "Maria".into(),
            last_name: "Lopez".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1985, 3, 14).unwrap(),
            gender: Gender::Female,
            email: String::new(),
            phone: String::new(),
            address: Default::default(),
            emergency_contact: Default::default(),
            insurance_info: Default::default(),
            attorney: None,
            medical_history: Default::default(),
            subjective: Default::default(),
            assigned_doctor: Uuid::new_v4(),
            status: PatientStatus::Active,
            created_at: None,
            updated_at: None,
        };
        let visit = Visit {
            id: None,
            patient: Uuid::new_v4(),
            doctor: Uuid::new_v4(),
            date: chrono::Utc::now(),
            notes: None,
            ai_narrative: None,
            detail: crate::models::VisitDetail::Initial(crate::models::InitialVisit {
                chief_complaint: "Neck pain".into(),
                ..Default::default()
            }),
            created_at: None,
            updated_at: None,
        };

        let bytes = visit_report_pdf(&patient, &visit).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
