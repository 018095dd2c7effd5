//! Nullable infrastructure for deterministic testing.
//!
//! Test-friendly stand-ins for the protocol's external dependencies that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests. The in-memory
//! store lives in `truthmarket-store` as `MemoryStore`; [`FlakyStore`] wraps
//! it to inject backend failures.

pub mod clock;
pub mod settlement;
pub mod store;

pub use clock::NullClock;
pub use settlement::NullSettlement;
pub use store::{FlakyStore, StoreOp};
