#![allow(dead_code, unused_imports)]

pub use termrun_test_utils::{builders, fake_terminal, init_tracing, with_timeout};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;
