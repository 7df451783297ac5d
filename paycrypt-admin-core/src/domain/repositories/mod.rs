//! Domain repositories
//!
//! This module contains the traits for the collaborators the admin core
//! consumes: persisted state, the wallet and the notification sink.

pub mod storage_repository;
pub mod wallet_repository;
pub mod notifier;

// Re-export repositories
pub use storage_repository::*;
pub use wallet_repository::*;
pub use notifier::*;
