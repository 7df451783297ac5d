//! Infrastructure layer - storage and wallet implementations
//!
//! Concrete implementations of the domain repository traits.

pub mod platform;
pub mod wallet;

// Re-export infrastructure components
pub use platform::*;
pub use wallet::*;
