pub mod commands;
pub mod modules;

pub use modules::cleaner;
pub use modules::common::config::RemediationConfig;
pub use modules::common::error::RemediationError;
pub use modules::executor;
pub use modules::locator;
pub use modules::orchestrator;
pub use modules::terminator;
