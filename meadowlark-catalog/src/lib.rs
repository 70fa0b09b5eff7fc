pub mod vacation;
pub mod filter;
pub mod fixtures;

pub use vacation::{format_cents, CatalogError, Vacation, VacationSummary};
pub use filter::CatalogFilter;
pub use fixtures::seed_vacations;
