//! CLI command handlers. Each command is in its own file.

mod eval;
mod outcome;
mod read;
mod schema;

pub use eval::run_eval;
pub use read::{run_read, ReadArgs};
pub use schema::run_schema;
