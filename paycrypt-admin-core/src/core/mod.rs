//! Core admin functionality
//!
//! This module contains the chain registry, chain selection, derived
//! per-chain clients, contract access, the backend client, analytics and
//! report export.

pub mod registry;
pub mod selection;
pub mod session;
pub mod notifications;
pub mod clients;
pub mod contract;
pub mod backend;
pub mod analytics;
pub mod reports;

// Re-export all public items from submodules
pub use registry::*;
pub use selection::*;
pub use session::*;
pub use notifications::*;
pub use clients::*;
pub use contract::*;
pub use backend::*;
pub use analytics::*;
pub use reports::*;
