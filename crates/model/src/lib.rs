pub mod catalog;
pub mod identifiers;
pub mod pagination;
pub mod records;
pub mod report;
pub mod result;
pub mod schema;
pub mod stats;
pub mod summary;
pub mod tally;
