//! Integration and property test suite for hdvault.
//!
//! The tests in `tests/` drive the public wallet API end to end and pin
//! derivation against fixed vectors.

pub mod helpers;
