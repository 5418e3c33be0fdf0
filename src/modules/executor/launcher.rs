use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};

use super::models::{LaunchResult, ProcessOutput, UninstallPlan};
use crate::modules::common::error::RemediationError;

/// 启动卸载程序并在超时内等待其结束
#[allow(async_fn_in_trait)]
pub trait Launcher {
    async fn launch(
        &self,
        plan: &UninstallPlan,
        timeout: Duration,
    ) -> Result<LaunchResult, RemediationError>;
}

/// 基于 tokio::process 的真实子进程启动器
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    async fn launch(
        &self,
        plan: &UninstallPlan,
        timeout: Duration,
    ) -> Result<LaunchResult, RemediationError> {
        let mut command = tokio::process::Command::from(build_command(plan));
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = command.spawn().map_err(|source| RemediationError::Launch {
            command: plan.command.clone(),
            source,
        })?;

        if let Some(pid) = child.id() {
            tracing::info!("Uninstaller started with PID {}", pid);
        }

        let stdout_task = tokio::spawn(read_stream(child.stdout.take()));
        let stderr_task = tokio::spawn(read_stream(child.stderr.take()));

        let status = match tokio::time::timeout(timeout, child.wait()).await {
            Ok(Ok(status)) => status,
            Ok(Err(source)) => {
                let _ = child.kill().await;
                return Err(RemediationError::Launch {
                    command: plan.command.clone(),
                    source,
                });
            }
            Err(_) => {
                tracing::warn!(
                    "Uninstaller still running after {}s, terminating it",
                    timeout.as_secs()
                );
                if let Err(e) = child.kill().await {
                    tracing::error!("Failed to terminate uninstaller: {}", e);
                }
                // 孙进程可能继承了管道句柄，不再等待读取
                stdout_task.abort();
                stderr_task.abort();
                return Ok(LaunchResult::TimedOut);
            }
        };

        let stdout = stdout_task.await.unwrap_or_default();
        let stderr = stderr_task.await.unwrap_or_default();

        Ok(LaunchResult::Exited(ProcessOutput {
            // 被信号终止时没有退出码
            exit_code: status.code().unwrap_or(-1),
            stdout,
            stderr,
        }))
    }
}

/// Windows 上参数原样传递，避免对已带引号的卸载参数再次转义
fn build_command(plan: &UninstallPlan) -> std::process::Command {
    let mut command = std::process::Command::new(&plan.command);

    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        if !plan.arguments.is_empty() {
            command.raw_arg(&plan.arguments);
        }
    }

    #[cfg(not(windows))]
    {
        command.args(plan.arguments.split_whitespace());
    }

    command
}

async fn read_stream<R: AsyncRead + Unpin>(stream: Option<R>) -> String {
    let mut buffer = Vec::new();
    if let Some(mut stream) = stream {
        let _ = stream.read_to_end(&mut buffer).await;
    }
    String::from_utf8_lossy(&buffer).into_owned()
}
