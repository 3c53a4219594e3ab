#![allow(unused_imports)]

pub use logexec_test_utils::{init_tracing, with_timeout};
