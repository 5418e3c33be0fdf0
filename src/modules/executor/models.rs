use std::fmt;

/// 卸载参数的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanSource {
    /// msiexec /x {GUID}
    InstallerGuid,
    QuietString,
    /// UninstallString，必要时补上静默开关
    UninstallString,
}

impl fmt::Display for PlanSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanSource::InstallerGuid => write!(f, "installer GUID"),
            PlanSource::QuietString => write!(f, "QuietUninstallString"),
            PlanSource::UninstallString => write!(f, "UninstallString"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UninstallPlan {
    pub command: String,
    pub arguments: String,
    pub source: PlanSource,
}

/// 子进程在超时前退出时的输出
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// 一次启动的结果；启动失败走 Err
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchResult {
    Exited(ProcessOutput),
    TimedOut,
}

/// 退出码分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitClass {
    Success,
    /// 3010 / 1641
    SuccessRestartRequired,
    Failure,
}

impl ExitClass {
    pub fn is_success(self) -> bool {
        !matches!(self, ExitClass::Failure)
    }
}

/// 卸载执行结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionReport {
    Completed {
        exit_code: i32,
        class: ExitClass,
    },
    TimedOut,
    LaunchFailed(String),
}

impl ExecutionReport {
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionReport::Completed { class, .. } if class.is_success())
    }
}
