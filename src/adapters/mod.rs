//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies (blockchain RPC, metrics export).
//!
//! Adapter categories:
//! - `chain`: EVM node access via alloy-rs
//! - `metrics`: Prometheus metrics export

pub mod chain;
pub mod metrics;
