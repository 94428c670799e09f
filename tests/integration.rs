//! Integration test suite.
//!
//! The lifecycle tests run against a local mock org. The live tests need a
//! real org and are ignored by default:
//!   SF_LOGIN_URL=... SF_USERNAME=... cargo test --test integration -- --ignored --nocapture

#[path = "integration/common.rs"]
mod common;
#[path = "integration/lifecycle.rs"]
mod lifecycle;
#[path = "integration/live.rs"]
mod live;
