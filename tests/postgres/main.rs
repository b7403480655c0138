//! PostgreSQL repository test suite.
//!
//! Requires a running PostgreSQL database reachable through RP_DB_URL.
//!
//! Run with: cargo test --test postgres -- --ignored

mod test_helpers;

mod test_cascade;
