//! Typed request parameters for the volunteer datatable
//!
//! The web layer parses raw HTTP parameters into these types before the
//! engine sees them; malformed values (a non-boolean string where a boolean
//! is expected, a negative offset) are rejected at that boundary. Sort-column
//! identifiers and filter keys form the stable contract with the UI grid —
//! renaming one requires a coordinated change on both sides.

/// Sortable columns, validated against a fixed allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Active,
    ContactsMadeInPastDays,
    DisplayName,
    Email,
    HasTransitionAgedYouthCases,
    MostRecentContactOccurredAt,
    SupervisorName,
}

impl SortColumn {
    /// Parse a wire identifier. Unknown identifiers return `None`, which the
    /// order compiler treats as "use the default ordering" rather than an
    /// error.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "active" => Some(Self::Active),
            "contacts_made_in_past_days" => Some(Self::ContactsMadeInPastDays),
            "display_name" => Some(Self::DisplayName),
            "email" => Some(Self::Email),
            "has_transition_aged_youth_cases" => Some(Self::HasTransitionAgedYouthCases),
            "most_recent_contact_occurred_at" => Some(Self::MostRecentContactOccurredAt),
            "supervisor_name" => Some(Self::SupervisorName),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Requested sort: column plus direction. `column: None` means "no valid
/// sort requested" and falls back to the default ordering.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sort {
    pub column: Option<SortColumn>,
    pub direction: SortDirection,
}

/// One entry of the supervisor filter. The UI sends supervisor display
/// names; a blank entry is the reserved marker for "no supervisor".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorSelection {
    Unassigned,
    Named(String),
}

impl SupervisorSelection {
    pub fn parse(raw: &str) -> Self {
        if raw.trim().is_empty() {
            Self::Unassigned
        } else {
            Self::Named(raw.to_string())
        }
    }
}

/// Filter block of the request.
///
/// `supervisor` is asymmetric with the other filters on purpose: an empty
/// list matches nothing (the UI must select at least one supervisor bucket),
/// whereas an absent `active` or `transition_aged_youth` matches everything.
#[derive(Debug, Clone, Default)]
pub struct VolunteerFilters {
    pub active: Option<bool>,
    pub supervisor: Vec<SupervisorSelection>,
    pub transition_aged_youth: Option<bool>,
}

/// Requested page window. `offset >= 0`, `limit > 0`; the web layer
/// validates both.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub offset: i64,
    pub limit: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 25,
        }
    }
}

/// The full filter/sort/search/page request handed to the engine.
#[derive(Debug, Clone, Default)]
pub struct DatatableRequest {
    pub sort: Sort,
    pub search_term: Option<String>,
    pub filters: VolunteerFilters,
    pub page: Page,
}
