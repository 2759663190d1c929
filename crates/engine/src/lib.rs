pub mod classify;
pub mod config;
pub mod error;
pub mod inspect;
pub mod resolver;
pub mod retention;
