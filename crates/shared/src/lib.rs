//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" every other crate agrees on:
//! - Error classification and the user-facing error value
//! - The diagnostics channel for misconfiguration reports
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all crates.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod diagnostic;
