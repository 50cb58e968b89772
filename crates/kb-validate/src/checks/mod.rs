//! Rule checks over a loaded table.
//!
//! Each check takes the table and the rule set and returns its own report;
//! [`crate::validate_table`] decides which checks run and in what order.

pub mod links;
pub mod membership;
pub mod schema;
pub mod uniqueness;

pub use links::validate_links;
pub use membership::validate_membership;
pub use schema::validate_schema;
pub use uniqueness::{duplicate_groups, validate_uniqueness};
