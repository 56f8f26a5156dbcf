//! Integration tests for the harvester
//!
//! These tests use wiremock to stand in for the listing site and run the
//! full harvest pipeline end-to-end.

mod harvest_tests;
