#![allow(dead_code)]

pub mod mock;

mod engine;

pub const TEST_ROOT: &str = "https://opendata.test.gov/resource";
