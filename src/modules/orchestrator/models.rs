use std::fmt;

/// 一次修复运行的最终结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    NotFound,
    UninstallSucceeded { restart_required: bool },
    UninstallFailed,
    UninstallTimedOut,
    VerificationFailed,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        matches!(self, Outcome::NotFound | Outcome::UninstallSucceeded { .. })
    }

    /// 进程退出码: 成功或无需处理为 0，其余为 1
    pub fn exit_code(self) -> u8 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::NotFound => write!(f, "application not installed"),
            Outcome::UninstallSucceeded {
                restart_required: false,
            } => write!(f, "uninstall succeeded"),
            Outcome::UninstallSucceeded {
                restart_required: true,
            } => write!(f, "uninstall succeeded, restart pending"),
            Outcome::UninstallFailed => write!(f, "uninstall failed"),
            Outcome::UninstallTimedOut => write!(f, "uninstall timed out"),
            Outcome::VerificationFailed => write!(f, "application still present after uninstall"),
        }
    }
}
