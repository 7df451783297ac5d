//! Domain layer - entities and repositories
//!
//! This module contains the domain model of the admin core and the traits
//! for the external collaborators it talks to.

pub mod entities;
pub mod repositories;

// Re-export domain components
pub use entities::*;
pub use repositories::*;
