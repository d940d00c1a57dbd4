//! Report delivery: local export first, then best-effort upload and
//! email. The saved file is the source of truth; the remote legs never
//! roll it back.

use std::path::{Path, PathBuf};

use crate::api::EmrClient;
use crate::models::Patient;
use crate::report::{
    export_pdf_to_file, narrative_report_filename, narrative_sections, plan_report,
    render_report, ReportError,
};

/// What happened to each delivery leg. `saved_path` is always present;
/// a failed upload or email is reported here, not raised.
#[derive(Debug)]
pub struct DeliveryOutcome {
    pub saved_path: PathBuf,
    pub uploaded: bool,
    pub emailed: bool,
}

/// Build the narrative report for a patient's visit history, save it
/// under `exports_dir`, then upload it and queue email delivery when
/// the patient has an email on file.
pub async fn deliver_narrative_report(
    client: &EmrClient,
    patient: &Patient,
    visits: &[crate::models::Visit],
    exports_dir: &Path,
) -> Result<DeliveryOutcome, ReportError> {
    let sections = narrative_sections(patient, visits);
    let title = format!("Narrative Report — {}", patient.full_name());
    let plan = plan_report(&title, &sections);
    let pdf_bytes = render_report(&plan)?;

    let file_name = narrative_report_filename(patient);
    let saved_path = export_pdf_to_file(&pdf_bytes, &file_name, exports_dir)?;
    tracing::info!(path = %saved_path.display(), pages = plan.page_count(), "narrative report saved");

    let uploaded = match client.upload_report(&file_name, pdf_bytes).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, file = %file_name, "report upload failed");
            false
        }
    };

    let emailed = if patient.email.trim().is_empty() {
        tracing::debug!("patient has no email on file; skipping email delivery");
        false
    } else {
        match client.email_report(&patient.email, &file_name).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "report email delivery failed");
                false
            }
        }
    };

    Ok(DeliveryOutcome { saved_path, uploaded, emailed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RequestContext;
    use crate::models::{Gender, PatientStatus};
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn sample_patient(email: &str) -> Patient {
        Patient {
            id: Some(Uuid::new_v4()),
            first_name: "Maria".into(),
            last_name: "Lopez".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1985, 3, 14).unwrap(),
            gender: Gender::Female,
            email: email.into(),
            phone: "562-555-0101".into(),
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
        }
    }

    #[tokio::test]
    async fn local_save_survives_remote_failures() {
        let dir = tempfile::tempdir().unwrap();
        // Unroutable endpoint: both remote legs fail.
        let client = EmrClient::new(RequestContext::new("http://127.0.0.1:1"));

        let outcome = deliver_narrative_report(
            &client,
            &sample_patient("maria@example.com"),
            &[],
            dir.path(),
        )
        .await
        .unwrap();

        assert!(outcome.saved_path.exists());
        assert!(!outcome.uploaded);
        assert!(!outcome.emailed);
        assert!(outcome.saved_path.ends_with("Lopez_Narrative_Report.pdf"));
    }

    #[tokio::test]
    async fn no_email_on_file_skips_the_email_leg() {
        let dir = tempfile::tempdir().unwrap();
        let client = EmrClient::new(RequestContext::new("http://127.0.0.1:1"));

        let outcome =
            deliver_narrative_report(&client, &sample_patient(""), &[], dir.path()).await.unwrap();
        assert!(!outcome.emailed);
    }
}
