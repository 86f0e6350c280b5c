//! Unit tests for the task context.

mod lifecycle_tests;
