//! Unit tests for the account context.

mod moderation_tests;
mod service_tests;
