//! Final exam score prediction from five student performance metrics.
//!
//! Metrics are collected into a [`core::PredictionRequest`], then run
//! through offline-fitted artifacts (polynomial expansion, scaling,
//! feature selection, linear regression) by an [`ml::PredictionInvoker`].

pub mod cli;
pub mod config;
pub mod core;
pub mod ml;
pub mod monitoring;
