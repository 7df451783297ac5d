//! Domain entities and value objects
//!
//! Chains are owned by this crate; orders and tokens are read-only
//! projections of backend and contract state.

pub mod chain;
pub mod order;
pub mod token;

// Re-export entities
pub use chain::*;
pub use order::*;
pub use token::*;
