//! Integration test harness for the verso binary.

mod hook_tests;
mod interrupt_tests;
mod list_tests;
