//! PostgreSQL-backed composition tests
//!
//! Run with `cargo test -p catalog-integration-tests -- --ignored` against a
//! reachable database.

mod common;
mod compositions;
