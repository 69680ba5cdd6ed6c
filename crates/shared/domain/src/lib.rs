//! # Domain Models
//!
//! Pure data for the broker: the Open Service Broker v2 wire types and the resolved
//! process configuration. Keep it lean: no I/O, networking, or behavior beyond
//! small conversions between request, result, and response shapes.
//!
//! The optional `openapi` feature derives `utoipa::ToSchema` for every wire type.

pub mod config;
pub mod constants;
pub mod protocol;
