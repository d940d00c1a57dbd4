//! `EmrClient`: typed access to the clinic REST API.
//!
//! Auth travels as an explicit [`RequestContext`] rather than ambient
//! state, so the data layer stays pure and testable. Every call is a
//! single request/response; there is no retry.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use super::ApiError;
use crate::config;
use crate::models::{Appointment, Invoice, Patient, PatientStatus, Visit};

/// Per-call request context: where to send, and who is asking.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub base_url: String,
    pub bearer_token: Option<String>,
}

impl RequestContext {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), bearer_token: None }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new(config::default_api_base_url())
    }
}

pub struct EmrClient {
    http: reqwest::Client,
    ctx: RequestContext,
}

#[derive(Debug, Deserialize)]
struct NarrativeResponse {
    success: bool,
    #[serde(default)]
    narrative: String,
}

#[derive(Debug, Deserialize)]
struct CountResponse {
    count: u64,
}

impl EmrClient {
    pub fn new(ctx: RequestContext) -> Self {
        Self { http: reqwest::Client::new(), ctx }
    }

    pub fn context(&self) -> &RequestContext {
        &self.ctx
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.ctx.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.http.request(method, self.url(path));
        if let Some(token) = &self.ctx.bearer_token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status.as_u16(), &body))
        }
    }

    async fn send_unit(&self, builder: reqwest::RequestBuilder) -> Result<(), ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status.as_u16(), &body))
        }
    }

    // ─── Patients ─────────────────────────────────────────────────────────────

    pub async fn list_patients(&self) -> Result<Vec<Patient>, ApiError> {
        self.send(self.request(reqwest::Method::GET, "api/patients")).await
    }

    pub async fn get_patient(&self, id: Uuid) -> Result<Patient, ApiError> {
        self.send(self.request(reqwest::Method::GET, &format!("api/patients/{id}"))).await
    }

    /// Create from a cleaned draft payload; returns the stored document.
    pub async fn create_patient(&self, payload: &Value) -> Result<Patient, ApiError> {
        self.send(self.request(reqwest::Method::POST, "api/patients").json(payload)).await
    }

    pub async fn update_patient(&self, id: Uuid, payload: &Value) -> Result<Patient, ApiError> {
        self.send(self.request(reqwest::Method::PUT, &format!("api/patients/{id}")).json(payload))
            .await
    }

    /// Lifecycle side effect of a discharge visit (UI-enforced, not
    /// transactional): mark the patient discharged.
    pub async fn update_patient_status(
        &self,
        id: Uuid,
        status: PatientStatus,
    ) -> Result<(), ApiError> {
        let body = serde_json::json!({ "status": status });
        self.send_unit(
            self.request(reqwest::Method::PATCH, &format!("api/patients/{id}")).json(&body),
        )
        .await
    }

    // ─── Visits ───────────────────────────────────────────────────────────────

    pub async fn list_visits(&self, patient_id: Uuid) -> Result<Vec<Visit>, ApiError> {
        self.send(self.request(reqwest::Method::GET, &format!("api/patients/{patient_id}/visits")))
            .await
    }

    /// Create a visit scoped under a patient. The payload carries the
    /// `visitType` discriminator set by the form controller.
    pub async fn create_visit(&self, patient_id: Uuid, payload: &Value) -> Result<Visit, ApiError> {
        self.send(
            self.request(reqwest::Method::POST, &format!("api/patients/{patient_id}/visits"))
                .json(payload),
        )
        .await
    }

    pub async fn get_visit(&self, id: Uuid) -> Result<Visit, ApiError> {
        self.send(self.request(reqwest::Method::GET, &format!("api/visits/{id}"))).await
    }

    /// Attach a generated narrative to an already-saved visit.
    pub async fn attach_narrative(&self, visit_id: Uuid, narrative: &str) -> Result<(), ApiError> {
        let body = serde_json::json!({ "aiNarrative": narrative });
        self.send_unit(
            self.request(reqwest::Method::PATCH, &format!("api/visits/{visit_id}")).json(&body),
        )
        .await
    }

    // ─── Read-only collaborators ──────────────────────────────────────────────

    pub async fn list_appointments(&self, patient_id: Uuid) -> Result<Vec<Appointment>, ApiError> {
        self.send(
            self.request(reqwest::Method::GET, &format!("api/patients/{patient_id}/appointments")),
        )
        .await
    }

    pub async fn invoice_count(&self, patient_id: Uuid) -> Result<u64, ApiError> {
        let response: CountResponse = self
            .send(
                self.request(
                    reqwest::Method::GET,
                    &format!("api/patients/{patient_id}/invoices/count"),
                ),
            )
            .await?;
        Ok(response.count)
    }

    pub async fn list_invoices(&self, patient_id: Uuid) -> Result<Vec<Invoice>, ApiError> {
        self.send(
            self.request(reqwest::Method::GET, &format!("api/patients/{patient_id}/invoices")),
        )
        .await
    }

    // ─── Narrative generation & report delivery ───────────────────────────────

    /// Submit visit-shaped form data and get generated narrative text.
    pub async fn generate_narrative(&self, payload: &Value) -> Result<String, ApiError> {
        let response: NarrativeResponse = self
            .send(self.request(reqwest::Method::POST, "api/generate-narrative").json(payload))
            .await?;
        if response.success {
            Ok(response.narrative)
        } else {
            Err(ApiError::Unexpected {
                status: 200,
                message: "narrative generation reported failure".into(),
            })
        }
    }

    pub async fn upload_report(&self, file_name: &str, pdf_bytes: Vec<u8>) -> Result<(), ApiError> {
        let part = reqwest::multipart::Part::bytes(pdf_bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")?;
        let form = reqwest::multipart::Form::new().part("file", part);
        self.send_unit(self.request(reqwest::Method::POST, "api/reports/upload").multipart(form))
            .await
    }

    pub async fn email_report(&self, email: &str, file_name: &str) -> Result<(), ApiError> {
        let body = serde_json::json!({ "email": email, "fileName": file_name });
        self.send_unit(self.request(reqwest::Method::POST, "api/reports/email").json(&body)).await
    }
}
