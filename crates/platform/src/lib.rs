//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - HTTP header name/value handling
//! - "Next tick" deferred execution
//! - Typed publish/subscribe event bus

pub mod bus;
pub mod header;
pub mod tick;
