#![allow(dead_code)]

pub use launchdeck_test_utils::builders::{JobProfileBuilder, shell_request};
pub use launchdeck_test_utils::{RecordingSink, init_tracing, with_timeout};
