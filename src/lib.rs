//! qrispay: merchant-code acquisition and transaction-draft assembly.
//!
//! The flow runs scan (camera or uploaded image) -> structural validation ->
//! merchant resolution -> a multi-step transfer wizard over one shared
//! transaction draft, with external services consumed through narrow ports.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
