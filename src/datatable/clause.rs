//! Predicate compiler: filter/search request -> parameterized WHERE clauses
//!
//! Every clause is a typed (SQL fragment, bound parameters) pair. Fragments
//! use `?` placeholders that are rewritten to real Postgres bindings when the
//! clause is pushed into an [`sqlx::QueryBuilder`] — caller-supplied strings
//! (search terms, supervisor names) never appear in SQL text. Each builder is
//! a pure function, unit-testable without a database, and the orchestrator
//! folds all of them with logical AND.

use chrono::NaiveDate;
use sqlx::{Postgres, QueryBuilder};

use super::request::{DatatableRequest, SupervisorSelection};
use super::schema;

/// A single bound parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    Bool(bool),
    Date(NaiveDate),
}

/// A SQL fragment with `?` placeholders plus its bound parameters, in
/// placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    sql: String,
    binds: Vec<BindValue>,
}

impl Clause {
    /// Placeholder count must match the bind count; fragments are built from
    /// static SQL text so a mismatch is a programming error.
    pub fn new(sql: impl Into<String>, binds: Vec<BindValue>) -> Self {
        let sql = sql.into();
        debug_assert_eq!(
            sql.matches('?').count(),
            binds.len(),
            "placeholder/bind count mismatch in clause: {sql}"
        );
        Self { sql, binds }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn binds(&self) -> &[BindValue] {
        &self.binds
    }

    /// Render this fragment into a query builder, replacing each `?` with a
    /// real bound parameter.
    pub fn push_to(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        let mut pieces = self.sql.split('?');
        if let Some(first) = pieces.next() {
            builder.push(first);
        }
        for (piece, bind) in pieces.zip(self.binds.iter()) {
            match bind {
                BindValue::Text(value) => builder.push_bind(value.clone()),
                BindValue::Bool(value) => builder.push_bind(*value),
                BindValue::Date(value) => builder.push_bind(*value),
            };
            builder.push(piece);
        }
    }
}

/// Compiled filter: either a constant verdict or a parameterized clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    MatchAll,
    MatchNone,
    Where(Clause),
}

/// Supervisor filter.
///
/// An empty selection matches nothing — the UI contract requires at least
/// one supervisor bucket to be picked, so the absent state is constant FALSE
/// rather than "match all". A selection of only the unassigned marker
/// matches volunteers without a resolved active supervisor; a mixed
/// selection matches on supervisor display name (falling back to email),
/// OR'd with the unassigned arm when the marker is present.
pub fn supervisor_clause(selections: &[SupervisorSelection]) -> Predicate {
    if selections.is_empty() {
        return Predicate::MatchNone;
    }

    let names: Vec<&String> = selections
        .iter()
        .filter_map(|s| match s {
            SupervisorSelection::Named(name) => Some(name),
            SupervisorSelection::Unassigned => None,
        })
        .collect();

    if names.is_empty() {
        return Predicate::Where(Clause::new("supervisors.id IS NULL", Vec::new()));
    }

    let placeholders = vec!["?"; names.len()].join(", ");
    let include_unassigned = names.len() < selections.len();
    let sql = if include_unassigned {
        format!(
            "supervisors.id IS NULL OR COALESCE(supervisors.display_name, supervisors.email) IN ({placeholders})"
        )
    } else {
        format!("COALESCE(supervisors.display_name, supervisors.email) IN ({placeholders})")
    };
    let binds = names
        .into_iter()
        .map(|name| BindValue::Text(name.clone()))
        .collect();

    Predicate::Where(Clause::new(sql, binds))
}

/// Active filter: absent matches all, present tests the volunteer's flag.
pub fn active_clause(active: Option<bool>) -> Predicate {
    match active {
        None => Predicate::MatchAll,
        Some(value) => Predicate::Where(Clause::new(
            "users.active = ?",
            vec![BindValue::Bool(value)],
        )),
    }
}

/// Transition-aged-youth filter: membership test against the derived
/// transition-youth relation joined by the orchestrator.
pub fn transition_aged_youth_clause(flag: Option<bool>) -> Predicate {
    match flag {
        None => Predicate::MatchAll,
        Some(true) => Predicate::Where(Clause::new(
            "transition_aged_youth_cases.volunteer_id IS NOT NULL",
            Vec::new(),
        )),
        Some(false) => Predicate::Where(Clause::new(
            "transition_aged_youth_cases.volunteer_id IS NULL",
            Vec::new(),
        )),
    }
}

/// Search filter: case-insensitive substring over volunteer and supervisor
/// name/email, or membership in the case-number subquery. All five pattern
/// parameters are bound; the term itself never reaches SQL text.
pub fn search_clause(term: Option<&str>) -> Predicate {
    let term = match term {
        Some(t) if !t.trim().is_empty() => t,
        _ => return Predicate::MatchAll,
    };

    let pattern = format!("%{term}%");
    let sql = format!(
        "users.display_name ILIKE ? \
         OR users.email ILIKE ? \
         OR supervisors.display_name ILIKE ? \
         OR supervisors.email ILIKE ? \
         OR users.id IN (\
             SELECT case_assignments.volunteer_id \
             FROM {} \
             WHERE casa_cases.case_number ILIKE ? \
             GROUP BY case_assignments.volunteer_id\
         )",
        schema::ASSIGNED_CASES
    );
    let binds = vec![BindValue::Text(pattern); 5];

    Predicate::Where(Clause::new(sql, binds))
}

/// Fold a list of predicates with logical AND. Constant-false wins
/// immediately; constant-true clauses contribute nothing; the rest are
/// parenthesized and conjoined.
pub fn fold_and(predicates: Vec<Predicate>) -> Predicate {
    let mut clauses: Vec<Clause> = Vec::new();
    for predicate in predicates {
        match predicate {
            Predicate::MatchAll => {}
            Predicate::MatchNone => return Predicate::MatchNone,
            Predicate::Where(clause) => clauses.push(clause),
        }
    }

    if clauses.is_empty() {
        return Predicate::MatchAll;
    }

    let sql = clauses
        .iter()
        .map(|c| format!("({})", c.sql()))
        .collect::<Vec<_>>()
        .join(" AND ");
    let binds = clauses
        .into_iter()
        .flat_map(|c| c.binds)
        .collect();

    Predicate::Where(Clause::new(sql, binds))
}

/// Compile the full request predicate: the four clauses ANDed.
pub fn compile_predicate(request: &DatatableRequest) -> Predicate {
    fold_and(vec![
        supervisor_clause(&request.filters.supervisor),
        active_clause(request.filters.active),
        transition_aged_youth_clause(request.filters.transition_aged_youth),
        search_clause(request.search_term.as_deref()),
    ])
}
