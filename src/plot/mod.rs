//! Diagnostic plot rendering
//!
//! Two plot products: a per-detector 2x2 grid of time-series scatter
//! plots, and a focal-plane mosaic of a per-channel scalar metric.

pub mod mosaic;
pub mod timeseries;
