pub mod dynamodb;
#[cfg(any(debug_assertions, test))]
mod dynamodb_schema;
pub mod error;
pub mod memory;
pub mod store;
pub mod types;
