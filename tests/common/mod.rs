#![allow(dead_code, unused_imports)]

pub use autopilot_test_utils::builders;
pub use autopilot_test_utils::fake_backend;
pub use autopilot_test_utils::{init_tracing, with_timeout};
