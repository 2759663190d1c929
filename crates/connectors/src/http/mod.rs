pub mod catalog;
pub mod error;
pub mod page;
pub mod upsert;
