//! Shared utilities.
//!
//! Deterministic directory hashing plus test helpers.

pub mod hash;

#[cfg(test)]
pub mod testutil;
