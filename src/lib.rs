//! casa-datatables — volunteer grid queries for CASA case management.
//!
//! Computes a filtered, sorted, searched, paginated view of volunteer
//! records, denormalizing supervisor assignment, most-recent contact,
//! contact counts and case flags into one row per volunteer. The web layer
//! hands in a typed [`DatatableRequest`]; the engine composes parameterized
//! Postgres SQL and returns a [`DatatablePage`].
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use casa_datatables::{
//!     DatabaseManager, DatatableRequest, SupervisorSelection, VolunteerFilters,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let db = DatabaseManager::from_env().await?;
//! let datatable = db.volunteer_datatable();
//!
//! // The supervisor filter is deliberately false-by-default: at least one
//! // bucket (a name, or the unassigned marker) must be selected.
//! let request = DatatableRequest {
//!     filters: VolunteerFilters {
//!         supervisor: vec![SupervisorSelection::Unassigned],
//!         ..VolunteerFilters::default()
//!     },
//!     ..DatatableRequest::default()
//! };
//! let page = datatable.fetch(&request).await?;
//! println!("{} of {} volunteers", page.rows.len(), page.total_count);
//! # Ok(())
//! # }
//! ```

// Core error handling
pub mod error;

// Connection management
pub mod database;

// The query composition engine
pub mod datatable;

pub use database::{DatabaseConfig, DatabaseManager};
pub use datatable::{
    DatatablePage, DatatableRequest, Page, Sort, SortColumn, SortDirection,
    SupervisorSelection, VolunteerDatatable, VolunteerFilters, VolunteerRow,
};
pub use error::DatatableError;
