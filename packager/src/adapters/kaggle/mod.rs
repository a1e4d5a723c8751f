//! Kaggle adapter
//!
//! Implementation of the leaderboard port over the Kaggle REST API,
//! plus the `kaggle.json` credentials file it authenticates from.

pub mod client;
pub mod credentials;

pub use client::KaggleClientImpl;
pub use credentials::KaggleCredentials;
