//! Common test utilities for typeck tests.
//! Re-exports helpers from tests/integration/common.

// Include the integration common module
#[path = "../integration/common/mod.rs"]
mod integration_common;

pub use integration_common::{check_should_fail_with, check_should_pass};
