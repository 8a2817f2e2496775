//! Row projector: joined query rows + eager-loaded case lists -> the output
//! records consumed by the UI grid.
//!
//! Timestamps stay as UTC instants; locale formatting belongs to the
//! rendering layer. A volunteer with no contact-made rows projects a null
//! most-recent contact, never an error.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// One row of the main page query: base volunteer columns plus the
/// denormalized supervisor and derived-relation columns.
#[derive(Debug, Clone, FromRow)]
pub struct JoinedRow {
    pub id: i64,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub active: bool,
    pub supervisor_id: Option<i64>,
    pub supervisor_name: Option<String>,
    pub has_transition_aged_youth_cases: bool,
    pub most_recent_contact_case_id: Option<i64>,
    pub most_recent_contact_occurred_at: Option<DateTime<Utc>>,
    pub contact_count: Option<i64>,
}

/// One row of the batched case eager-load, keyed by volunteer id.
/// `contacted_in_window` is true when this volunteer has a contact-made
/// contact for this case within the contact window.
#[derive(Debug, Clone, FromRow)]
pub struct CaseRow {
    pub volunteer_id: i64,
    pub id: i64,
    pub case_number: String,
    pub contacted_in_window: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MostRecentContact {
    pub case_id: Option<i64>,
    pub occurred_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupervisorRef {
    pub id: Option<i64>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CasaCaseRef {
    pub id: i64,
    pub case_number: String,
}

/// The output record shape for one volunteer row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerRow {
    pub id: i64,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub active: bool,
    pub has_transition_aged_youth_cases: bool,
    pub made_contact_with_all_cases_in_days: bool,
    pub contacts_made_in_past_days: i64,
    pub most_recent_contact: MostRecentContact,
    pub supervisor: SupervisorRef,
    pub casa_cases: Vec<CasaCaseRef>,
}

/// One page of results plus the pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatatablePage {
    pub rows: Vec<VolunteerRow>,
    pub total_count: i64,
}

impl DatatablePage {
    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            total_count: 0,
        }
    }
}

/// Project one joined row plus its eager-loaded cases into the output shape.
///
/// `made_contact_with_all_cases_in_days` is true exactly when every assigned
/// case was contacted within the window — vacuously true for a volunteer
/// with no cases.
pub fn project(joined: JoinedRow, cases: &[CaseRow]) -> VolunteerRow {
    let made_contact_with_all = cases.iter().all(|case| case.contacted_in_window);
    let casa_cases = cases
        .iter()
        .map(|case| CasaCaseRef {
            id: case.id,
            case_number: case.case_number.clone(),
        })
        .collect();

    VolunteerRow {
        id: joined.id,
        display_name: joined.display_name,
        email: joined.email,
        active: joined.active,
        has_transition_aged_youth_cases: joined.has_transition_aged_youth_cases,
        made_contact_with_all_cases_in_days: made_contact_with_all,
        contacts_made_in_past_days: joined.contact_count.unwrap_or(0),
        most_recent_contact: MostRecentContact {
            case_id: joined.most_recent_contact_case_id,
            occurred_at: joined.most_recent_contact_occurred_at,
        },
        supervisor: SupervisorRef {
            id: joined.supervisor_id,
            name: joined.supervisor_name,
        },
        casa_cases,
    }
}
