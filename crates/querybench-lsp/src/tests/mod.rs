//! SQL completion tests
//!
//! Organized by category:
//! - test_helpers: Common fixtures and a scripted gateway
//! - test_context_detection: Tests for context classification and its stability under edits
//! - test_completions: Tests for the suggestions produced per context
//! - test_catalog_store: Tests for catalog loading and stale fetch handling
