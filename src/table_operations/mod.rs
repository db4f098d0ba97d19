//! Table management operations.
//!
//! - `create` - Create the table with its key schema and GSIs
//! - `exists` - Check if the table exists
//! - `wait` - Wait for the table and its indexes to become active

mod create;
mod exists;
mod wait;

pub use create::create_table;
pub use exists::table_exists;
pub use wait::wait_for_table_active;
