//! Integration test modules

mod launch_tests;
mod pipeline_tests;
