//! Order compiler: allow-listed sort column -> ORDER BY expression.
//!
//! Column identifiers come from a fixed allow-list, so no caller-controlled
//! text ever reaches the ORDER BY; an unknown or absent column degrades to
//! the default ordering rather than erroring. The orchestrator always
//! appends the `users.id` tie-break so pagination stays deterministic when
//! primary sort keys collide.

use super::request::{Sort, SortColumn};

/// Default ordering when no valid sort was requested. Display name falls
/// back to email, matching how volunteer names are rendered.
pub const DEFAULT_ORDER: &str = "COALESCE(users.display_name, users.email) ASC";

/// Secondary sort key, always applied after the primary ordering.
pub const TIE_BREAK: &str = "users.id ASC";

fn sort_target(column: SortColumn) -> &'static str {
    match column {
        SortColumn::Active => "users.active",
        SortColumn::ContactsMadeInPastDays => "contacts_made_in_past_days.contact_count",
        SortColumn::DisplayName => "COALESCE(users.display_name, users.email)",
        SortColumn::Email => "users.email",
        SortColumn::HasTransitionAgedYouthCases => {
            "transition_aged_youth_cases.volunteer_id IS NOT NULL"
        }
        SortColumn::MostRecentContactOccurredAt => "most_recent_contacts.occurred_at",
        SortColumn::SupervisorName => "COALESCE(supervisors.display_name, supervisors.email)",
    }
}

/// Compile the primary ORDER BY expression for a requested sort.
pub fn order_expression(sort: &Sort) -> String {
    match sort.column {
        Some(column) => format!("{} {}", sort_target(column), sort.direction.as_sql()),
        None => DEFAULT_ORDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatable::request::SortDirection;

    #[test]
    fn absent_column_falls_back_to_default() {
        let sort = Sort {
            column: None,
            direction: SortDirection::Desc,
        };
        assert_eq!(order_expression(&sort), DEFAULT_ORDER);
    }

    #[test]
    fn unknown_wire_identifier_orders_like_display_name_asc() {
        let unknown = Sort {
            column: SortColumn::parse("not_a_column"),
            direction: SortDirection::Asc,
        };
        let display_name = Sort {
            column: Some(SortColumn::DisplayName),
            direction: SortDirection::Asc,
        };
        assert_eq!(order_expression(&unknown), order_expression(&display_name));
    }

    #[test]
    fn direction_is_applied_to_the_target() {
        let sort = Sort {
            column: Some(SortColumn::SupervisorName),
            direction: SortDirection::Desc,
        };
        assert_eq!(
            order_expression(&sort),
            "COALESCE(supervisors.display_name, supervisors.email) DESC"
        );
    }

    #[test]
    fn every_allow_listed_column_compiles() {
        let columns = [
            SortColumn::Active,
            SortColumn::ContactsMadeInPastDays,
            SortColumn::DisplayName,
            SortColumn::Email,
            SortColumn::HasTransitionAgedYouthCases,
            SortColumn::MostRecentContactOccurredAt,
            SortColumn::SupervisorName,
        ];
        for column in columns {
            let sort = Sort {
                column: Some(column),
                direction: SortDirection::Asc,
            };
            let expr = order_expression(&sort);
            assert!(expr.ends_with(" ASC"), "unexpected expression: {expr}");
        }
    }
}
