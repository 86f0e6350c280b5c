//! Unit tests for the catalog context.

mod region_tests;
