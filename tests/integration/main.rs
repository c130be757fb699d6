//! Integration tests for the clinic scheduler public API

mod support;

mod adjustment_tests;
mod live_backend_tests;
mod weekly_schedule_tests;
