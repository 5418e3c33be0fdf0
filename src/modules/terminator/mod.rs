pub mod system;

use std::time::Duration;

use crate::modules::common::error::RemediationError;

/// 进程表: 按名称查询、请求关闭、强制结束
pub trait ProcessTable {
    /// 名称比较不区分大小写，忽略 `.exe` 后缀
    fn find_by_name(&mut self, name: &str) -> Vec<u32>;

    fn request_close(&mut self, pid: u32) -> Result<(), RemediationError>;

    fn is_running(&mut self, pid: u32) -> bool;

    fn force_kill(&mut self, pid: u32) -> Result<(), RemediationError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerminationReport {
    pub closed: usize,
    pub killed: usize,
    pub failures: Vec<String>,
}

/// 要结束的进程名列表
///
/// 显式列表非空时直接使用；否则从显示名称推测: 去空格、空格换点、第一个单词。
pub fn candidate_process_names(display_name: &str, explicit: &[String]) -> Vec<String> {
    let explicit: Vec<String> = explicit
        .iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect();
    if !explicit.is_empty() {
        return explicit;
    }

    let name = display_name.trim();
    let guesses = [
        name.replace(' ', ""),
        name.replace(' ', "."),
        name.split_whitespace().next().unwrap_or_default().to_string(),
    ];

    let mut candidates: Vec<String> = Vec::new();
    for guess in guesses {
        if !guess.is_empty() && !candidates.iter().any(|c| c.eq_ignore_ascii_case(&guess)) {
            candidates.push(guess);
        }
    }
    candidates
}

/// 先请求关闭，等待宽限期后强制结束仍在运行的进程
///
/// 尽力而为: 单个进程失败只记录日志，不影响整体结果。
pub async fn terminate_processes<T: ProcessTable>(
    table: &mut T,
    names: &[String],
    grace_period: Duration,
) -> TerminationReport {
    let mut report = TerminationReport::default();

    for name in names {
        let pids = table.find_by_name(name);
        if pids.is_empty() {
            tracing::debug!("No running process named {}", name);
            continue;
        }

        tracing::info!("Closing {} running instance(s) of {}", pids.len(), name);
        for pid in &pids {
            if let Err(e) = table.request_close(*pid) {
                tracing::warn!("Graceful close of {} refused: {}", name, e);
            }
        }

        tokio::time::sleep(grace_period).await;

        for pid in pids {
            if !table.is_running(pid) {
                report.closed += 1;
                continue;
            }

            match table.force_kill(pid) {
                Ok(()) => {
                    tracing::info!("Force-terminated {} (PID {})", name, pid);
                    report.killed += 1;
                }
                Err(e) => {
                    tracing::error!("Failed to terminate {} (PID {}): {}", name, pid, e);
                    report.failures.push(format!("{} ({}): {}", name, pid, e));
                }
            }
        }
    }

    report
}
