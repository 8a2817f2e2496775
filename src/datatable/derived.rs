//! Derived-relation builder: the three reusable subqueries joined against
//! the base volunteer relation.
//!
//! Each relation is an independent [`Clause`] fragment so the orchestrator
//! and the predicate compiler reuse the exact same SQL. All are computed
//! once per request and threaded explicitly; there is no lazy caching on
//! shared state.

use chrono::{Days, NaiveDate};

use super::clause::{BindValue, Clause};
use super::schema;

/// Length of the contact window in days. A system-wide constant, not
/// request-controlled.
pub const CONTACT_MADE_IN_PAST_DAYS_NUM: u64 = 60;

/// Inclusive lower bound of the contact window: a contact made exactly
/// `CONTACT_MADE_IN_PAST_DAYS_NUM` days ago still counts.
pub fn contact_window_cutoff(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_days(Days::new(CONTACT_MADE_IN_PAST_DAYS_NUM))
        .unwrap_or(NaiveDate::MIN)
}

/// Distinct volunteer ids holding at least one assignment to a
/// transition-aged-youth case. Grouping collapses multi-case assignments to
/// one row per volunteer.
pub fn transition_aged_youth_cases() -> Clause {
    Clause::new(
        format!(
            "SELECT case_assignments.volunteer_id \
             FROM {} \
             WHERE casa_cases.transition_aged_youth = TRUE \
             GROUP BY case_assignments.volunteer_id",
            schema::ASSIGNED_CASES
        ),
        Vec::new(),
    )
}

/// Contact-made rows ranked per creator, most recent first. Rank 1 is the
/// volunteer's most recent contact. The `id` key in the window ordering
/// makes rank 1 deterministic when several contacts share the maximum
/// `occurred_at`.
pub fn most_recent_contacts() -> Clause {
    Clause::new(
        format!(
            "SELECT case_contacts.creator_id, \
                    case_contacts.casa_case_id, \
                    case_contacts.occurred_at, \
                    ROW_NUMBER() OVER (\
                        PARTITION BY case_contacts.creator_id \
                        ORDER BY case_contacts.occurred_at DESC NULLS LAST, case_contacts.id\
                    ) AS contact_index \
             FROM case_contacts \
             WHERE {}",
            schema::CONTACT_MADE
        ),
        Vec::new(),
    )
}

/// Per-creator count of contact-made rows on or after the window cutoff.
/// The cutoff is a bound parameter.
pub fn contacts_made_in_past_days(cutoff: NaiveDate) -> Clause {
    Clause::new(
        format!(
            "SELECT case_contacts.creator_id, \
                    COUNT(*) AS contact_count \
             FROM case_contacts \
             WHERE {} \
               AND case_contacts.occurred_at >= ? \
             GROUP BY case_contacts.creator_id",
            schema::CONTACT_MADE
        ),
        vec![BindValue::Date(cutoff)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cutoff_is_inclusive_at_exactly_n_days() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 26).unwrap();
        let cutoff = contact_window_cutoff(today);
        assert_eq!(cutoff, NaiveDate::from_ymd_opt(2026, 6, 27).unwrap());

        // `occurred_at >= cutoff` includes a contact exactly N days ago and
        // excludes one at N + 1.
        let n_days_ago = today.checked_sub_days(Days::new(CONTACT_MADE_IN_PAST_DAYS_NUM)).unwrap();
        let n_plus_one = today.checked_sub_days(Days::new(CONTACT_MADE_IN_PAST_DAYS_NUM + 1)).unwrap();
        assert!(n_days_ago >= cutoff);
        assert!(n_plus_one < cutoff);
    }

    #[test]
    fn transition_youth_relation_groups_per_volunteer() {
        let clause = transition_aged_youth_cases();
        assert!(clause.sql().contains("GROUP BY case_assignments.volunteer_id"));
        assert!(clause.sql().contains("casa_cases.transition_aged_youth = TRUE"));
        assert!(clause.binds().is_empty());
    }

    #[test]
    fn most_recent_contacts_rank_by_occurred_at_with_stable_tie_break() {
        let clause = most_recent_contacts();
        assert!(clause
            .sql()
            .contains("ORDER BY case_contacts.occurred_at DESC NULLS LAST, case_contacts.id"));
        assert!(clause.sql().contains("PARTITION BY case_contacts.creator_id"));
        assert!(clause.sql().contains("case_contacts.contact_made = TRUE"));
    }

    #[test]
    fn contact_count_window_binds_the_cutoff() {
        let cutoff = NaiveDate::from_ymd_opt(2026, 6, 27).unwrap();
        let clause = contacts_made_in_past_days(cutoff);
        assert!(clause.sql().contains("case_contacts.occurred_at >= ?"));
        assert_eq!(clause.binds(), &[BindValue::Date(cutoff)]);
    }
}
