//! Chain selection
//!
//! Persisted selection, the coordinator that owns the current chain, and the
//! observer that keeps it in step with the wallet.

pub mod coordinator;
pub mod observer;
pub mod store;

pub use coordinator::*;
pub use observer::*;
pub use store::*;
