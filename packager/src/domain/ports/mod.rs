//! Domain ports (traits)
//!
//! Port traits define interfaces that the packager requires.
//! Adapters provide concrete implementations of these traits.

pub mod delivery;
pub mod leaderboard;
pub mod run_tracker;

pub use delivery::{DeliveryReceipt, FileDelivery};
pub use leaderboard::Leaderboard;
pub use run_tracker::{RunTracker, TrackerAccount};
