//! Unit tests for the content context.

mod article_service_tests;
