//! Volunteer datatable query engine.
//!
//! Given a declarative filter/sort/search/page request, composes one
//! parameterized read query over the volunteer schema (plus one batched
//! case eager-load) and projects the result into UI grid rows. The stages
//! are independent and independently testable:
//!
//! Request -> predicate compiler + order compiler -> orchestrator
//! (joins derived relations, paginates) -> row projector -> page.

pub mod clause;
pub mod derived;
pub mod order;
pub mod request;
pub mod row;
pub mod schema;
pub mod volunteer;

pub use request::{
    DatatableRequest, Page, Sort, SortColumn, SortDirection, SupervisorSelection,
    VolunteerFilters,
};
pub use row::{CasaCaseRef, DatatablePage, MostRecentContact, SupervisorRef, VolunteerRow};
pub use volunteer::VolunteerDatatable;
