//! Core library for the consistent hash ring.
//!
//! This crate provides the ring and its analysis collaborator:
//! - Token type for positions on the 32-bit hash circle
//! - Ring membership, virtual-node placement, and key lookup
//! - Distribution quality and latency reporting

pub mod error;
pub mod metrics;
pub mod ring;
pub mod token;

pub use error::{Error, Result};
pub use metrics::{analyze_performance, PerformanceReport};
pub use ring::HashRing;
pub use token::RingToken;
