//! Symbol handling: rendering, readability verification, logo compositing
//! and payload parsing.
//!
//! Everything in this module is synchronous and CPU-bound with no shared
//! mutable state, so it is safe to run concurrently across independent
//! requests without locking.

pub mod codec;
pub mod logo;
pub mod url;
