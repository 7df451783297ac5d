pub mod analytics;
pub mod chains;
pub mod contract;
pub mod orders;
pub mod session;
pub mod system;

pub use analytics::*;
pub use chains::*;
pub use contract::*;
pub use orders::*;
pub use session::*;
pub use system::*;
