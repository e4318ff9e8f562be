pub mod provision;
pub mod schema;
