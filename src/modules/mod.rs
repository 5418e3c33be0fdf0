pub mod cleaner;
pub mod common;
pub mod executor;
pub mod locator;
pub mod orchestrator;
pub mod terminator;
