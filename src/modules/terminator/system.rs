use sysinfo::{Pid, ProcessesToUpdate, System};

use super::ProcessTable;
use crate::modules::common::error::RemediationError;

/// 基于 sysinfo 的系统进程表
pub struct SystemProcessTable {
    system: System,
}

impl SystemProcessTable {
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }

    fn refresh_one(&mut self, pid: u32) {
        let pid = Pid::from_u32(pid);
        self.system
            .refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
    }
}

impl Default for SystemProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

/// `Firefox.EXE` 与 `firefox` 视为同名
fn normalize_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    match lowered.strip_suffix(".exe") {
        Some(stem) => stem.to_string(),
        None => lowered,
    }
}

impl ProcessTable for SystemProcessTable {
    fn find_by_name(&mut self, name: &str) -> Vec<u32> {
        self.system.refresh_processes(ProcessesToUpdate::All, true);

        let wanted = normalize_name(name);
        let own_pid = std::process::id();
        let mut pids: Vec<u32> = self
            .system
            .processes()
            .iter()
            .filter(|(_, process)| normalize_name(&process.name().to_string_lossy()) == wanted)
            .map(|(pid, _)| pid.as_u32())
            .filter(|pid| *pid != own_pid)
            .collect();
        pids.sort_unstable();
        pids
    }

    fn request_close(&mut self, pid: u32) -> Result<(), RemediationError> {
        #[cfg(windows)]
        {
            // 不带 /F 的 taskkill 会向窗口发送关闭消息
            let output = std::process::Command::new("taskkill")
                .args(["/PID", &pid.to_string()])
                .output()
                .map_err(|e| RemediationError::Process {
                    pid,
                    message: e.to_string(),
                })?;
            if output.status.success() {
                Ok(())
            } else {
                Err(RemediationError::Process {
                    pid,
                    message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                })
            }
        }

        #[cfg(not(windows))]
        {
            let process = self
                .system
                .process(Pid::from_u32(pid))
                .ok_or_else(|| RemediationError::Process {
                    pid,
                    message: "process not found".to_string(),
                })?;
            match process.kill_with(sysinfo::Signal::Term) {
                Some(true) => Ok(()),
                Some(false) => Err(RemediationError::Process {
                    pid,
                    message: "SIGTERM was not delivered".to_string(),
                }),
                None => Err(RemediationError::Process {
                    pid,
                    message: "graceful close is not supported".to_string(),
                }),
            }
        }
    }

    fn is_running(&mut self, pid: u32) -> bool {
        self.refresh_one(pid);
        self.system.process(Pid::from_u32(pid)).is_some()
    }

    fn force_kill(&mut self, pid: u32) -> Result<(), RemediationError> {
        self.refresh_one(pid);
        let Some(process) = self.system.process(Pid::from_u32(pid)) else {
            // 已经退出
            return Ok(());
        };

        if process.kill() {
            Ok(())
        } else {
            Err(RemediationError::Process {
                pid,
                message: "kill request was rejected".to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_compare_without_exe_suffix() {
        assert_eq!(normalize_name("Firefox.EXE"), "firefox");
        assert_eq!(normalize_name(" zoom "), "zoom");
        assert_eq!(normalize_name("Zoom.us"), "zoom.us");
    }

    #[test]
    fn never_matches_own_process() {
        let mut table = SystemProcessTable::new();
        let own_pid = std::process::id();
        let exe = std::env::current_exe().unwrap();
        let own_name = exe.file_name().unwrap().to_string_lossy().to_string();
        assert!(!table.find_by_name(&own_name).contains(&own_pid));
    }

    #[test]
    fn unknown_name_finds_nothing() {
        let mut table = SystemProcessTable::new();
        assert!(table
            .find_by_name("definitely-not-a-running-process-4f1c")
            .is_empty());
    }
}
