//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod host;
pub mod kaggle;
pub mod wandb;

pub use host::HostEnvironment;
pub use kaggle::{KaggleClientImpl, KaggleCredentials};
pub use wandb::WandbClientImpl;
