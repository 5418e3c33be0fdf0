pub mod launcher;
pub mod models;
pub mod plan;

use std::time::Duration;

use launcher::Launcher;
use models::{ExecutionReport, ExitClass, LaunchResult, UninstallPlan};

/// 0 成功；3010/1641 成功但需要重启；其他均视为失败
pub fn classify_exit_code(code: i32) -> ExitClass {
    match code {
        0 => ExitClass::Success,
        3010 | 1641 => ExitClass::SuccessRestartRequired,
        _ => ExitClass::Failure,
    }
}

/// 执行卸载计划并对结果分类
pub async fn run_plan<L: Launcher>(
    launcher: &L,
    plan: &UninstallPlan,
    timeout: Duration,
) -> ExecutionReport {
    tracing::info!(
        "Running uninstaller ({}): {} {}",
        plan.source,
        plan.command,
        plan.arguments
    );

    let output = match launcher.launch(plan, timeout).await {
        Ok(LaunchResult::Exited(output)) => output,
        Ok(LaunchResult::TimedOut) => {
            tracing::error!(
                "Uninstaller timed out after {} seconds and was terminated",
                timeout.as_secs()
            );
            return ExecutionReport::TimedOut;
        }
        Err(e) => {
            tracing::error!("Failed to run uninstaller: {}", e);
            return ExecutionReport::LaunchFailed(e.to_string());
        }
    };

    if !output.stdout.trim().is_empty() {
        tracing::debug!("Uninstaller stdout: {}", output.stdout.trim());
    }
    if !output.stderr.trim().is_empty() {
        tracing::debug!("Uninstaller stderr: {}", output.stderr.trim());
    }

    let class = classify_exit_code(output.exit_code);
    match class {
        ExitClass::Success => {
            tracing::info!("Uninstaller exited with code {}", output.exit_code);
        }
        ExitClass::SuccessRestartRequired => {
            tracing::warn!(
                "Uninstaller exited with code {} (restart required)",
                output.exit_code
            );
        }
        ExitClass::Failure => {
            tracing::error!("Uninstaller failed with exit code {}", output.exit_code);
        }
    }

    ExecutionReport::Completed {
        exit_code: output.exit_code,
        class,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::common::error::RemediationError;
    use crate::modules::executor::models::{PlanSource, ProcessOutput};

    enum Scripted {
        Exit(i32),
        Timeout,
        Missing,
    }

    impl Launcher for Scripted {
        async fn launch(
            &self,
            plan: &UninstallPlan,
            _timeout: Duration,
        ) -> Result<LaunchResult, RemediationError> {
            match self {
                Scripted::Exit(code) => Ok(LaunchResult::Exited(ProcessOutput {
                    exit_code: *code,
                    stdout: String::new(),
                    stderr: "MSI (s) log".to_string(),
                })),
                Scripted::Timeout => Ok(LaunchResult::TimedOut),
                Scripted::Missing => Err(RemediationError::Launch {
                    command: plan.command.clone(),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                }),
            }
        }
    }

    fn plan() -> UninstallPlan {
        UninstallPlan {
            command: "msiexec.exe".to_string(),
            arguments: "/x {00000000-0000-0000-0000-000000000000} /qn".to_string(),
            source: PlanSource::InstallerGuid,
        }
    }

    #[test]
    fn exit_code_classification() {
        assert_eq!(classify_exit_code(0), ExitClass::Success);
        assert_eq!(classify_exit_code(3010), ExitClass::SuccessRestartRequired);
        assert_eq!(classify_exit_code(1641), ExitClass::SuccessRestartRequired);
        for code in [1, 1603, 1605, -1, 2] {
            assert_eq!(classify_exit_code(code), ExitClass::Failure);
        }
    }

    #[tokio::test]
    async fn restart_codes_count_as_success() {
        let report = run_plan(&Scripted::Exit(3010), &plan(), Duration::from_secs(1)).await;
        assert!(report.is_success());
    }

    #[tokio::test]
    async fn failing_exit_code_is_reported() {
        let report = run_plan(&Scripted::Exit(1603), &plan(), Duration::from_secs(1)).await;
        assert_eq!(
            report,
            ExecutionReport::Completed {
                exit_code: 1603,
                class: ExitClass::Failure
            }
        );
        assert!(!report.is_success());
    }

    #[tokio::test]
    async fn timeout_and_launch_errors_are_failures() {
        let report = run_plan(&Scripted::Timeout, &plan(), Duration::from_secs(1)).await;
        assert_eq!(report, ExecutionReport::TimedOut);

        let report = run_plan(&Scripted::Missing, &plan(), Duration::from_secs(1)).await;
        assert!(matches!(report, ExecutionReport::LaunchFailed(_)));
        assert!(!report.is_success());
    }
}
