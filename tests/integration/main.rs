//! Integration test entry point
//!
//! All tests here require a running server and database:
//! `cargo test --test main -- --ignored`

mod api_tests;
