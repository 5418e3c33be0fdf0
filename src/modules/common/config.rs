//! 单次运行的不可变配置

use std::path::PathBuf;
use std::time::Duration;

use crate::modules::common::error::RemediationError;
use crate::modules::locator::models::MatchCriteria;

pub const DEFAULT_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_GRACE_SECS: u64 = 3;
pub const DEFAULT_SETTLE_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct RemediationConfig {
    pub criteria: MatchCriteria,
    pub timeout: Duration,
    pub force_close_processes: bool,
    /// 为空时根据显示名称推测进程名
    pub process_names: Vec<String>,
    /// 无条件追加到卸载参数末尾
    pub extra_arguments: Option<String>,
    pub verify_after_uninstall: bool,
    pub grace_period: Duration,
    pub settle_delay: Duration,
    pub remove_leftovers: bool,
    /// msiexec 详细日志的存放目录
    pub log_dir: PathBuf,
}

impl RemediationConfig {
    pub fn new(criteria: MatchCriteria, log_dir: PathBuf) -> Self {
        Self {
            criteria,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            force_close_processes: true,
            process_names: Vec::new(),
            extra_arguments: None,
            verify_after_uninstall: true,
            grace_period: Duration::from_secs(DEFAULT_GRACE_SECS),
            settle_delay: Duration::from_secs(DEFAULT_SETTLE_SECS),
            remove_leftovers: false,
            log_dir,
        }
    }

    pub fn validate(&self) -> Result<(), RemediationError> {
        if self.criteria.display_name.trim().is_empty() {
            return Err(RemediationError::Config(
                "application display name must not be empty".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(RemediationError::Config(
                "uninstall timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
