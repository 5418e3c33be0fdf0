use thiserror::Error;

#[derive(Error, Debug)]
pub enum RemediationError {
    #[error("inventory source {source_name} unreadable: {message}")]
    Inventory { source_name: String, message: String },

    #[error("process {pid}: {message}")]
    Process { pid: u32, message: String },

    #[error("no uninstall command available for {0}")]
    NoUninstallPlan(String),

    #[error("failed to launch {command}: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("refusing to touch protected path: {0}")]
    ProtectedPath(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}
