//! Schema accessors: read-only descriptors of the four relations behind the
//! volunteer grid.
//!
//! Volunteers and supervisors share the `users` table; `supervisor_volunteers`
//! links them; `case_assignments` links volunteers to `casa_cases`;
//! `case_contacts` records contact events. The fragments here are the single
//! source for the join shapes reused across the predicate compiler, the
//! derived relations and the orchestrator.

/// Active-supervisor resolution: the link row must be flagged active AND the
/// supervisor's account must be active. LEFT joins so supervisorless
/// volunteers stay in the result — "no supervisor" is itself a filterable
/// state.
pub const ACTIVE_SUPERVISOR_JOIN: &str = "LEFT JOIN supervisor_volunteers \
         ON supervisor_volunteers.volunteer_id = users.id \
        AND supervisor_volunteers.is_active \
     LEFT JOIN users supervisors \
         ON supervisors.id = supervisor_volunteers.supervisor_id \
        AND supervisors.active";

/// Case assignments joined to their cases (the volunteer/case many-to-many
/// with the case's category flag and case number in reach).
pub const ASSIGNED_CASES: &str =
    "case_assignments JOIN casa_cases ON casa_cases.id = case_assignments.casa_case_id";

/// Predicate separating contacts that actually happened from
/// attempted-but-unsuccessful ones; only these participate in
/// most-recent and count-in-window computations.
pub const CONTACT_MADE: &str = "case_contacts.contact_made = TRUE";
