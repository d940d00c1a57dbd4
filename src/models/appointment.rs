use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{AppointmentStatus, InvoiceStatus};

/// Scheduled encounter, fetched for display only. Scheduling logic
/// lives behind the REST boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub patient: Uuid,
    pub doctor: Uuid,
    pub date: DateTime<Utc>,
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Billing record, fetched for count/list display only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,
    pub patient: Uuid,
    pub date: DateTime<Utc>,
    pub status: InvoiceStatus,
    pub total_cents: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visit: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appointment_wire_format() {
        let doc = serde_json::json!({
            "id": "5f6a7b8c-9d0e-4f1a-b2c3-d4e5f6a7b8c9",
            "patient": "0b7b5c86-9a1d-4f3e-8f2a-6c5d4e3f2a1b",
            "doctor": "6dd7b9e4-2b8c-4a7e-9a61-1f2a3b4c5d6e",
            "date": "2026-03-01T17:00:00Z",
            "status": "scheduled"
        });
        let appt: Appointment = serde_json::from_value(doc).unwrap();
        assert_eq!(appt.status, AppointmentStatus::Scheduled);
        assert!(appt.reason.is_none());
    }

    #[test]
    fn invoice_wire_format() {
        let doc = serde_json::json!({
            "id": "5f6a7b8c-9d0e-4f1a-b2c3-d4e5f6a7b8c9",
            "patient": "0b7b5c86-9a1d-4f3e-8f2a-6c5d4e3f2a1b",
            "date": "2026-03-01T17:00:00Z",
            "status": "sent",
            "totalCents": 12500
        });
        let invoice: Invoice = serde_json::from_value(doc).unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Sent);
        assert_eq!(invoice.total_cents, 12500);
    }
}
