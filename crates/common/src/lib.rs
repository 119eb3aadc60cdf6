//! Common utilities and types shared across the warm transfer crates.

#![warn(clippy::pedantic)]

/// Module for secret types that prevent accidental logging
pub mod secret;

/// Module for room access token claims and unverified claim decoding
pub mod jwt;
