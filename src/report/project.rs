//! Projection of patient and visit documents into report sections.
//!
//! The same sections back the on-screen detail view and the PDF, so the
//! two can never drift apart. Empty leaves are omitted; structurally
//! expected sections (medical history) carry explicit placeholders
//! instead of vanishing.

use crate::models::{
    DischargeVisit, FollowupVisit, InitialVisit, Patient, Visit, VisitDetail,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub fields: Vec<Field>,
}

impl Section {
    fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), fields: Vec::new() }
    }

    /// Add a field unless its value is blank.
    fn push(&mut self, label: &str, value: impl AsRef<str>) {
        let value = value.as_ref().trim();
        if !value.is_empty() {
            self.fields.push(Field { label: label.into(), value: value.into() });
        }
    }

    fn push_list(&mut self, label: &str, items: &[String]) {
        let joined: Vec<&str> =
            items.iter().map(|s| s.trim()).filter(|s| !s.is_empty()).collect();
        if !joined.is_empty() {
            self.fields.push(Field { label: label.into(), value: joined.join(", ") });
        }
    }

    /// Like `push_list`, with a placeholder when the list is empty.
    fn push_list_or(&mut self, label: &str, items: &[String], placeholder: &str) {
        let before = self.fields.len();
        self.push_list(label, items);
        if self.fields.len() == before {
            self.fields.push(Field { label: label.into(), value: placeholder.into() });
        }
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn yes_no_flags(flags: &[(&str, bool)]) -> String {
    flags
        .iter()
        .filter(|(_, set)| *set)
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(", ")
}

// ─── Patient sections ─────────────────────────────────────────────────────────

fn demographics_section(patient: &Patient) -> Section {
    let mut section = Section::new("Patient Information");
    section.push("Name", patient.full_name());
    section.push("Date of Birth", patient.date_of_birth.format("%Y-%m-%d").to_string());
    section.push("Gender", title_case(patient.gender.as_str()));
    section.push("Phone", &patient.phone);
    section.push("Email", &patient.email);

    let address = &patient.address;
    let mut parts: Vec<&str> =
        vec![&address.street, &address.city, &address.state, &address.zip_code];
    if let Some(country) = &address.country {
        parts.push(country);
    }
    let rendered: Vec<&str> = parts.into_iter().map(str::trim).filter(|s| !s.is_empty()).collect();
    if !rendered.is_empty() {
        section.push("Address", rendered.join(", "));
    }

    section.push("Status", title_case(patient.status.as_str()));
    section
}

fn history_section(patient: &Patient) -> Section {
    let history = &patient.medical_history;
    let mut section = Section::new("Medical History");
    section.push_list_or("Allergies", &history.allergies, "No known allergies");
    section.push_list_or("Medications", &history.medications, "No current medications");
    section.push_list_or("Conditions", &history.conditions, "No prior conditions reported");
    section.push_list_or("Surgeries", &history.surgeries, "No prior surgeries");
    section.push_list_or(
        "Family History",
        &history.family_history,
        "No significant family history",
    );
    section
}

fn insurance_section(patient: &Patient) -> Section {
    let info = &patient.insurance_info;
    let mut section = Section::new("Insurance");
    section.push("Provider", &info.provider);
    section.push("Policy Number", &info.policy_number);
    section.push("Group Number", &info.group_number);
    section.push("Primary Insured", &info.primary_insured);
    section
}

fn attorney_section(patient: &Patient) -> Option<Section> {
    let attorney = patient.attorney.as_ref()?;
    let mut section = Section::new("Attorney");
    section.push("Name", &attorney.name);
    section.push("Firm", &attorney.firm);
    section.push("Phone", &attorney.phone);
    section.push("Email", &attorney.email);
    Some(section)
}

fn subjective_section(patient: &Patient) -> Section {
    let intake = &patient.subjective;
    let mut section = Section::new("Subjective Complaints");
    section.push_list("Body Parts", &intake.body_part);
    section.push("Severity", &intake.severity);
    section.push_list("Quality", &intake.quality);
    section.push("Timing", &intake.timing);
    section.push("Context", &intake.context);
    section.push_list("Exacerbated By", &intake.exacerbated_by);
    section.push_list("Symptoms", &intake.symptoms);
    section.push_list("Physical", &intake.physical);
    section.push_list("Sleep", &intake.sleep);
    section.push_list("Cognitive", &intake.cognitive);
    section.push_list("Digestive", &intake.digestive);
    section.push_list("Emotional", &intake.emotional);
    section.push("Radiating To", &intake.radiating_to);
    section.push(
        "Radiating Side",
        yes_no_flags(&[("Right", intake.radiating_right), ("Left", intake.radiating_left)]),
    );
    section.push(
        "Sciatica",
        yes_no_flags(&[("Right", intake.sciatica_right), ("Left", intake.sciatica_left)]),
    );
    section.push("Notes", &intake.notes);
    section
}

// ─── Visit sections ───────────────────────────────────────────────────────────

fn initial_visit_fields(section: &mut Section, visit: &InitialVisit) {
    section.push("Chief Complaint", &visit.chief_complaint);
    section.push_list("Chiropractic Adjustment", &visit.chiropractic_adjustment);
    if let Some(other) = &visit.chiropractic_other {
        section.push("Chiropractic Other", other);
    }
    section.push_list("Acupuncture", &visit.acupuncture);
    if let Some(other) = &visit.acupuncture_other {
        section.push("Acupuncture Other", other);
    }
    section.push_list("Physiotherapy", &visit.physiotherapy);
    section.push_list("Rehabilitation Exercises", &visit.rehabilitation_exercises);

    if let Some(df) = &visit.duration_frequency {
        if let Some(times) = df.times_per_week {
            section.push("Frequency", format!("{times}x per week"));
        }
        if let Some(weeks) = df.re_eval_in_weeks {
            section.push("Re-evaluation", format!("in {weeks} weeks"));
        }
    }

    section.push_list("Referrals", &visit.referrals);

    if let Some(imaging) = &visit.imaging {
        section.push_list("X-Ray", &imaging.xray);
        section.push_list("MRI", &imaging.mri);
        section.push_list("CT", &imaging.ct);
    }
    if let Some(us) = &visit.diagnostic_ultrasound {
        section.push("Diagnostic Ultrasound", us);
    }
    section.push_list("Nerve Study", &visit.nerve_study);

    if let Some(r) = &visit.restrictions {
        if let Some(weeks) = r.avoid_activity_weeks {
            section.push("Avoid Activity", format!("{weeks} weeks"));
        }
        if let Some(lbs) = r.lifting_limit_lbs {
            section.push("Lifting Limit", format!("{lbs} lbs"));
        }
        if r.avoid_prolonged_sitting {
            section.push("Restrictions", "Avoid prolonged sitting/standing");
        }
    }
    if let Some(d) = &visit.disability_duration {
        section.push("Disability Duration", d);
    }
    if let Some(notes) = &visit.other_notes {
        section.push("Other Notes", notes);
    }
}

fn followup_visit_fields(section: &mut Section, visit: &FollowupVisit) {
    if let Some(areas) = &visit.areas {
        section.push("Areas", areas);
    }
    section.push(
        "Areas Status",
        yes_no_flags(&[
            ("Improving", visit.areas_improving),
            ("Exacerbated", visit.areas_exacerbated),
            ("Same", visit.areas_same),
        ]),
    );
    if let Some(palpation) = &visit.muscle_palpation {
        section.push("Muscle Palpation", palpation);
    }
    if let Some(radiating) = &visit.pain_radiating {
        section.push("Pain Radiating", radiating);
    }
    section.push(
        "Range of Motion",
        yes_no_flags(&[
            ("WNL no pain", visit.rom_wnl_no_pain),
            ("WNL with pain", visit.rom_wnl_with_pain),
            ("Improved", visit.rom_improved),
            ("Decreased", visit.rom_decreased),
            ("Same", visit.rom_same),
        ]),
    );
    if let Some(orthos) = &visit.orthos {
        section.push("Orthopedic Tests", &orthos.tests);
        section.push("Orthopedic Results", &orthos.result);
    }
    if let Some(activities) = &visit.activities_cause_pain {
        section.push("Activities Causing Pain", activities);
    }
    if let Some(other) = &visit.activities_cause_pain_other {
        section.push("Activities Causing Pain (Other)", other);
    }
    if let Some(plan) = &visit.treatment_plan {
        section.push("Treatment Plan", &plan.treatments);
        section.push("Treatment Frequency", &plan.times_per_week);
    }
    if let Some(response) = &visit.overall_response {
        section.push(
            "Overall Response",
            yes_no_flags(&[
                ("Improving", response.improving),
                ("Worse", response.worse),
                ("Same", response.same),
            ]),
        );
    }
    if let Some(referrals) = &visit.referrals {
        section.push("Referrals", referrals);
    }
    if let Some(study) = &visit.diagnostic_study {
        section.push("Diagnostic Study", &study.study);
        section.push("Study Body Part", &study.body_part);
        section.push("Study Result", &study.result);
    }
    if let Some(home_care) = &visit.home_care {
        section.push("Home Care", home_care);
    }
}

fn discharge_visit_fields(section: &mut Section, visit: &DischargeVisit) {
    section.push(
        "Areas Status",
        yes_no_flags(&[
            ("Improving", visit.areas_improving),
            ("Exacerbated", visit.areas_exacerbated),
            ("Same", visit.areas_same),
        ]),
    );
    if let Some(palpation) = &visit.muscle_palpation {
        section.push("Muscle Palpation", palpation);
    }
    if let Some(radiating) = &visit.pain_radiating {
        section.push("Pain Radiating", radiating);
    }
    if let Some(percent) = visit.rom_percent {
        section.push("Range of Motion", format!("{percent}% of pre-injury"));
    }
    if let Some(orthos) = &visit.orthos {
        section.push("Orthopedic Tests", &orthos.tests);
        section.push("Orthopedic Results", &orthos.result);
    }
    if let Some(activities) = &visit.activities_cause_pain {
        section.push("Activities Causing Pain", activities);
    }
    if let Some(prognosis) = &visit.prognosis {
        section.push("Prognosis", prognosis);
    }
    if let Some(study) = &visit.diagnostic_study {
        section.push("Diagnostic Study", &study.study);
        section.push("Study Body Part", &study.body_part);
        section.push("Study Result", &study.result);
    }
    section.push_list("Future Medical Care", &visit.future_medical_care);
    if let Some(croft) = &visit.croft_criteria {
        section.push("Croft Criteria", croft);
    }
    if let Some(ama) = &visit.ama_disability {
        section.push("AMA Disability", ama);
    }
    section.push_list("Home Care", &visit.home_care);
    if let Some(referrals) = &visit.referrals_notes {
        section.push("Referrals", referrals);
    }
    if let Some(notes) = &visit.other_notes {
        section.push("Other Notes", notes);
    }
}

fn visit_section(visit: &Visit) -> Section {
    let date = visit.date.format("%Y-%m-%d").to_string();
    let title = match &visit.detail {
        VisitDetail::Initial(_) => format!("Initial Visit — {date}"),
        VisitDetail::Followup(_) => format!("Follow-up Visit — {date}"),
        VisitDetail::Discharge(_) => format!("Discharge Visit — {date}"),
    };

    let mut section = Section::new(title);
    match &visit.detail {
        VisitDetail::Initial(v) => initial_visit_fields(&mut section, v),
        VisitDetail::Followup(v) => followup_visit_fields(&mut section, v),
        VisitDetail::Discharge(v) => discharge_visit_fields(&mut section, v),
    }
    if let Some(notes) = &visit.notes {
        section.push("Visit Notes", notes);
    }
    if let Some(narrative) = &visit.ai_narrative {
        section.push("Narrative", narrative);
    }
    section
}

// ─── Public projections ───────────────────────────────────────────────────────

/// Sections for the full narrative report: demographics, history,
/// intake, then every visit in the order given (expected chronological).
/// Sections that projected down to nothing are dropped, except the
/// structurally required medical history.
pub fn narrative_sections(patient: &Patient, visits: &[Visit]) -> Vec<Section> {
    let mut sections = vec![demographics_section(patient), history_section(patient)];
    sections.push(insurance_section(patient));
    if let Some(attorney) = attorney_section(patient) {
        sections.push(attorney);
    }
    sections.push(subjective_section(patient));
    sections.extend(visits.iter().map(visit_section));
    sections.retain(|s| !s.fields.is_empty());
    sections
}

/// Sections for the short patient summary sheet.
pub fn patient_summary_sections(patient: &Patient) -> Vec<Section> {
    let mut sections = vec![demographics_section(patient), history_section(patient)];
    sections.retain(|s| !s.fields.is_empty());
    sections
}

/// Sections for a standalone single-visit report: who the patient is,
/// then that one visit's fields.
pub fn visit_report_sections(patient: &Patient, visit: &Visit) -> Vec<Section> {
    let mut sections = vec![demographics_section(patient), visit_section(visit)];
    sections.retain(|s| !s.fields.is_empty());
    sections
}

// ─── File names ───────────────────────────────────────────────────────────────

fn sanitize_component(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    if cleaned.is_empty() { "Unknown".into() } else { cleaned }
}

pub fn narrative_report_filename(patient: &Patient) -> String {
    format!("{}_Narrative_Report.pdf", sanitize_component(&patient.last_name))
}

pub fn patient_summary_filename(patient: &Patient) -> String {
    format!(
        "Patient_{}_{}.pdf",
        sanitize_component(&patient.first_name),
        sanitize_component(&patient.last_name)
    )
}

pub fn visit_report_filename(visit: &Visit) -> String {
    format!(
        "Visit_{}_{}.pdf",
        visit.visit_type().as_str(),
        visit.date.format("%Y-%m-%d")
    )
}
