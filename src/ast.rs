//! An abstract syntax tree for the SQL statements the resolver issues.
//!
//! The ast module handles building abstract SQL queries without going into
//! database-level specifics. Turning them into SQL text and parameters is the
//! job of the [visitor](../visitor/index.html) module.
//!
//! For prelude, all important imports are in `upsert_resolver::ast::*`.
mod column;
mod compare;
mod conditions;
mod insert;
mod query;
mod select;
mod table;
mod values;

pub use column::Column;
pub use compare::{Comparable, Compare};
pub use conditions::ConditionTree;
pub use insert::*;
pub use query::Query;
pub use select::Select;
pub use table::Table;
pub use values::Value;

pub(crate) use values::Params;
