pub mod error;

pub use error::{DashboardError, DashboardResult};
