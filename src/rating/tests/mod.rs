//! Unit tests for the rating context.
