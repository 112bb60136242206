//! Discovery and classification engine for local IPv4 networks.
//!
//! [`service::ScanService`] is the entry point for front ends. The pieces it is
//! built from are public so they can be driven, or faked, one at a time.

pub mod auxiliary;
pub mod classifier;
pub mod discovery;
pub mod network;
pub mod prober;
pub mod ranges;
pub mod scanner;
pub mod service;
pub mod system;
