//! Testing fixtures for Component Flow hosts

pub mod fixtures;

pub use fixtures::*;

/// Routes `log` output through `env_logger` for the current test binary.
/// Safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::init_logging;
}
