//! Query orchestrator for the volunteer datatable.
//!
//! Joins the base volunteer relation to the active-supervisor link and the
//! three derived relations, applies the compiled predicate and ordering plus
//! the id tie-break, paginates, and batch-loads each page volunteer's case
//! list in a single additional query. Storage failures propagate unchanged;
//! there is no retry logic here.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

use super::clause::{compile_predicate, Predicate};
use super::derived;
use super::order::{self, TIE_BREAK};
use super::request::{DatatableRequest, Page, Sort};
use super::row::{self, CaseRow, DatatablePage, JoinedRow};
use super::schema;
use crate::error::DatatableError;

fn cases_for_volunteers_sql() -> String {
    format!(
        "SELECT case_assignments.volunteer_id AS volunteer_id, \
                casa_cases.id AS id, \
                casa_cases.case_number AS case_number, \
                EXISTS (\
                    SELECT 1 FROM case_contacts \
                    WHERE case_contacts.creator_id = case_assignments.volunteer_id \
                      AND case_contacts.casa_case_id = casa_cases.id \
                      AND {} \
                      AND case_contacts.occurred_at >= $2\
                ) AS contacted_in_window \
         FROM {} \
         WHERE case_assignments.volunteer_id = ANY($1) \
         ORDER BY case_assignments.volunteer_id, casa_cases.id",
        schema::CONTACT_MADE,
        schema::ASSIGNED_CASES
    )
}

/// Read-only query service producing the volunteer grid.
pub struct VolunteerDatatable {
    pool: PgPool,
}

impl VolunteerDatatable {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Compute one page of the grid for `request`, using the current date
    /// for the contact window.
    pub async fn fetch(&self, request: &DatatableRequest) -> Result<DatatablePage, DatatableError> {
        self.fetch_as_of(request, Utc::now().date_naive()).await
    }

    /// Like [`fetch`](Self::fetch) with an explicit "today", so window
    /// boundaries are reproducible in tests and backfills.
    pub async fn fetch_as_of(
        &self,
        request: &DatatableRequest,
        today: NaiveDate,
    ) -> Result<DatatablePage, DatatableError> {
        let cutoff = derived::contact_window_cutoff(today);
        let predicate = compile_predicate(request);

        // Constant-false predicate (e.g. no supervisor bucket selected):
        // the result is the empty page, no round trip needed.
        if predicate == Predicate::MatchNone {
            debug!("predicate folded to constant false, returning empty page");
            return Ok(DatatablePage::empty());
        }

        let total_count: i64 = count_builder(&predicate, cutoff)
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let joined: Vec<JoinedRow> =
            page_builder(&predicate, &request.sort, request.page, cutoff)
                .build_query_as()
                .fetch_all(&self.pool)
                .await?;

        let ids: Vec<i64> = joined.iter().map(|row| row.id).collect();
        let mut cases_by_volunteer = self.load_cases(&ids, cutoff).await?;

        let rows = joined
            .into_iter()
            .map(|row| {
                let cases = cases_by_volunteer.remove(&row.id).unwrap_or_default();
                row::project(row, &cases)
            })
            .collect();

        debug!(total_count, "volunteer datatable page computed");
        Ok(DatatablePage { rows, total_count })
    }

    /// Batched eager-load of case lists for the page's volunteers. One
    /// query keyed by `= ANY(ids)`, never one query per volunteer.
    async fn load_cases(
        &self,
        volunteer_ids: &[i64],
        cutoff: NaiveDate,
    ) -> Result<HashMap<i64, Vec<CaseRow>>, DatatableError> {
        if volunteer_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sql = cases_for_volunteers_sql();
        let rows: Vec<CaseRow> = sqlx::query_as(&sql)
            .bind(volunteer_ids)
            .bind(cutoff)
            .fetch_all(&self.pool)
            .await?;

        let mut grouped: HashMap<i64, Vec<CaseRow>> = HashMap::new();
        for case in rows {
            grouped.entry(case.volunteer_id).or_default().push(case);
        }
        Ok(grouped)
    }
}

/// Push the shared FROM block: base volunteers LEFT JOINed to the active
/// supervisor link/account and the three derived relations. Left joins keep
/// supervisorless and contactless volunteers in the result.
fn push_base_from(builder: &mut QueryBuilder<'static, Postgres>, cutoff: NaiveDate) {
    builder.push("FROM users ");
    builder.push(schema::ACTIVE_SUPERVISOR_JOIN);
    builder.push(" LEFT JOIN (");
    derived::transition_aged_youth_cases().push_to(builder);
    builder.push(
        ") transition_aged_youth_cases \
             ON transition_aged_youth_cases.volunteer_id = users.id \
         LEFT JOIN (",
    );
    derived::most_recent_contacts().push_to(builder);
    builder.push(
        ") most_recent_contacts \
             ON most_recent_contacts.creator_id = users.id \
            AND most_recent_contacts.contact_index = 1 \
         LEFT JOIN (",
    );
    derived::contacts_made_in_past_days(cutoff).push_to(builder);
    builder.push(
        ") contacts_made_in_past_days \
             ON contacts_made_in_past_days.creator_id = users.id",
    );
}

fn push_predicate(builder: &mut QueryBuilder<'static, Postgres>, predicate: &Predicate) {
    match predicate {
        Predicate::MatchAll => {}
        Predicate::MatchNone => {
            builder.push(" WHERE FALSE");
        }
        Predicate::Where(clause) => {
            builder.push(" WHERE ");
            clause.push_to(builder);
        }
    }
}

/// Total-count query over the filtered, unpaginated relation.
fn count_builder(predicate: &Predicate, cutoff: NaiveDate) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) ");
    push_base_from(&mut builder, cutoff);
    push_predicate(&mut builder, predicate);
    builder
}

/// Page query: projection columns, joins, predicate, ordering, tie-break
/// and bound LIMIT/OFFSET.
fn page_builder(
    predicate: &Predicate,
    sort: &Sort,
    page: Page,
    cutoff: NaiveDate,
) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(
        "SELECT users.id, \
                users.display_name, \
                users.email, \
                users.active, \
                supervisors.id AS supervisor_id, \
                COALESCE(supervisors.display_name, supervisors.email) AS supervisor_name, \
                transition_aged_youth_cases.volunteer_id IS NOT NULL AS has_transition_aged_youth_cases, \
                most_recent_contacts.casa_case_id AS most_recent_contact_case_id, \
                most_recent_contacts.occurred_at AS most_recent_contact_occurred_at, \
                contacts_made_in_past_days.contact_count AS contact_count ",
    );
    push_base_from(&mut builder, cutoff);
    push_predicate(&mut builder, predicate);

    builder.push(" ORDER BY ");
    builder.push(order::order_expression(sort));
    builder.push(", ");
    builder.push(TIE_BREAK);

    builder.push(" LIMIT ");
    builder.push_bind(page.limit);
    builder.push(" OFFSET ");
    builder.push_bind(page.offset);
    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatable::request::{SortColumn, SortDirection, SupervisorSelection, VolunteerFilters};

    fn request_with_supervisors() -> DatatableRequest {
        DatatableRequest {
            filters: VolunteerFilters {
                supervisor: vec![SupervisorSelection::Named("Jane Doe".into())],
                ..VolunteerFilters::default()
            },
            ..DatatableRequest::default()
        }
    }

    fn cutoff() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 27).unwrap()
    }

    #[test]
    fn count_query_joins_all_derived_relations_without_pagination() {
        let predicate = compile_predicate(&request_with_supervisors());
        let builder = count_builder(&predicate, cutoff());
        let sql = builder.sql();

        assert!(sql.starts_with("SELECT COUNT(*) FROM users"));
        assert!(sql.contains(") transition_aged_youth_cases"));
        assert!(sql.contains(") most_recent_contacts"));
        assert!(sql.contains(") contacts_made_in_past_days"));
        assert!(sql.contains("most_recent_contacts.contact_index = 1"));
        assert!(!sql.contains("LIMIT"));
        // The only ORDER BY is inside the ranking window; the count itself
        // is unordered and unpaginated.
        assert!(sql.ends_with(
            "WHERE (COALESCE(supervisors.display_name, supervisors.email) IN ($2))"
        ));
    }

    #[test]
    fn page_query_orders_then_tie_breaks_then_paginates() {
        let predicate = Predicate::MatchAll;
        let sort = Sort {
            column: Some(SortColumn::MostRecentContactOccurredAt),
            direction: SortDirection::Desc,
        };
        let page = Page {
            offset: 50,
            limit: 25,
        };
        let builder = page_builder(&predicate, &sort, page, cutoff());
        let sql = builder.sql();

        // Binds: $1 window cutoff, $2 limit, $3 offset.
        assert!(sql.contains("case_contacts.occurred_at >= $1"));
        assert!(sql.ends_with(
            "ORDER BY most_recent_contacts.occurred_at DESC, users.id ASC LIMIT $2 OFFSET $3"
        ));
    }

    #[test]
    fn page_query_places_predicate_binds_before_pagination_binds() {
        let predicate = compile_predicate(&request_with_supervisors());
        let builder = page_builder(&predicate, &Sort::default(), Page::default(), cutoff());
        let sql = builder.sql();

        // $1 cutoff inside the derived relation, $2 the supervisor name,
        // then LIMIT/OFFSET.
        assert!(sql.contains(
            "WHERE (COALESCE(supervisors.display_name, supervisors.email) IN ($2))"
        ));
        assert!(sql.ends_with(
            "ORDER BY COALESCE(users.display_name, users.email) ASC, users.id ASC LIMIT $3 OFFSET $4"
        ));
    }

    #[test]
    fn supervisorless_volunteers_survive_the_joins() {
        let builder = count_builder(&Predicate::MatchAll, cutoff());
        let sql = builder.sql();
        assert!(sql.contains("LEFT JOIN supervisor_volunteers"));
        assert!(sql.contains("LEFT JOIN users supervisors"));
        assert!(sql.contains("supervisor_volunteers.is_active"));
        assert!(sql.contains("supervisors.active"));
    }

    // A lazy pool never opens a connection, so this passes only because
    // the constant-false fold returns before any query is issued.
    #[tokio::test]
    async fn empty_supervisor_filter_returns_empty_page_without_storage() {
        let pool = PgPool::connect_lazy("postgresql://unreachable.invalid:5432/casa").unwrap();
        let datatable = VolunteerDatatable::new(pool);

        let request = DatatableRequest::default();
        let page = datatable
            .fetch_as_of(&request, NaiveDate::from_ymd_opt(2026, 8, 26).unwrap())
            .await
            .unwrap();

        assert!(page.rows.is_empty());
        assert_eq!(page.total_count, 0);
    }

    #[test]
    fn eager_load_is_batched_by_volunteer_ids() {
        let sql = cases_for_volunteers_sql();
        assert!(sql.contains("= ANY($1)"));
        assert!(sql.contains("case_contacts.contact_made = TRUE"));
        assert!(sql.contains("case_contacts.occurred_at >= $2"));
        assert!(sql.ends_with("ORDER BY case_assignments.volunteer_id, casa_cases.id"));
    }
}
