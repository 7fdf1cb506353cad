//! Integration tests for the proxy
//!
//! These tests use wiremock as the upstream site and drive the axum router
//! directly, covering the full request cycle end-to-end.

mod api_tests;
