//! # Core Module
//!
//! Fundamental concurrency and timing primitives used throughout the engine.
//!
//! ## Key Components
//! - `MtResource`: Thread-safe reference-counted resource with read-write locking.
//!   Shared world data (the voxel store) lives in one so background mesh walks can
//!   read it while the main thread stays the only writer.
//! - `Clock`: Time source for scheduled work, with a wall-clock and a manual variant.
//!
//! ## Usage
//! ```rust
//! use blockworld::core::MtResource;
//!
//! let counter = MtResource::new(0);
//! *counter.get_mut() += 1;
//! assert_eq!(*counter.get(), 1);
//! ```

pub mod clock;
pub mod mt_resource;

pub use clock::{Clock, ManualClock, SystemClock};
pub use mt_resource::{MtResource, ResourcePoisoned};
