pub mod config;
pub mod driver;
pub mod error;
pub mod kernel;
pub mod session;

// Re-export specific items if needed for convenient access
pub use crate::config::SkillConfig;
pub use driver::reactor::SkillReactor;
pub use kernel::outcome::TurnOutcome;
