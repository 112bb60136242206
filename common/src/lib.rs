//! Shared models for the `lanmap` workspace.
//!
//! Everything that crosses a crate boundary lives here: host records and the
//! device vocabulary, CIDR ranges, scan configuration and the boundary error type.

pub mod config;
pub mod device;
pub mod error;
pub mod network;
