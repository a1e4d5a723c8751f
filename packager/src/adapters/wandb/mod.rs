//! Weights & Biases adapter
//!
//! Implementation of the run-tracker port over the W&B GraphQL API.

pub mod client;

pub use client::WandbClientImpl;
