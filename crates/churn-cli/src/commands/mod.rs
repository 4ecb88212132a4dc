//! CLI Command Implementations
//!
//! - [`serve`]: HTTP prediction server
//! - [`predict`]: one-shot prediction

mod predict;
mod serve;

pub use predict::PredictCommand;
pub use serve::ServeCommand;
