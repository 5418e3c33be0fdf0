//! 卸载编排: 查找 → 结束进程 → 卸载 → 验证 → (清理残留)

pub mod models;

use std::time::Duration;

use crate::modules::cleaner;
use crate::modules::common::config::RemediationConfig;
use crate::modules::common::error::RemediationError;
use crate::modules::executor::launcher::Launcher;
use crate::modules::executor::models::{ExecutionReport, ExitClass};
use crate::modules::executor::{self, plan};
use crate::modules::locator::{self, models::MatchCriteria, InventorySource};
use crate::modules::terminator::{self, ProcessTable};
use models::Outcome;

pub struct Orchestrator<'a, P, L> {
    config: &'a RemediationConfig,
    sources: Vec<Box<dyn InventorySource>>,
    processes: P,
    launcher: L,
}

impl<'a, P: ProcessTable, L: Launcher> Orchestrator<'a, P, L> {
    pub fn new(
        config: &'a RemediationConfig,
        sources: Vec<Box<dyn InventorySource>>,
        processes: P,
        launcher: L,
    ) -> Self {
        Self {
            config,
            sources,
            processes,
            launcher,
        }
    }

    /// 执行一次完整的修复流程
    pub async fn run(&mut self) -> Result<Outcome, RemediationError> {
        self.config.validate()?;

        let outcome = self.run_steps().await;
        if outcome.is_success() {
            tracing::info!("Remediation finished: {}", outcome);
        } else {
            tracing::error!("Remediation failed: {}", outcome);
        }
        Ok(outcome)
    }

    async fn run_steps(&mut self) -> Outcome {
        let config = self.config;
        let criteria = &config.criteria;

        tracing::info!(
            "Looking for '{}' ({} match)",
            criteria.display_name,
            if criteria.exact_match { "exact" } else { "substring" }
        );

        let Some(record) = locator::locate(&self.sources, criteria).into_first() else {
            tracing::info!(
                "'{}' is not installed, no remediation needed",
                criteria.display_name
            );
            return Outcome::NotFound;
        };

        tracing::info!(
            "Found '{}' version {} from {} (publisher: {}, id: {})",
            record.display_name,
            record.display_version.as_deref().unwrap_or("unknown"),
            record.source,
            record.publisher.as_deref().unwrap_or("-"),
            record.product_id.as_deref().unwrap_or("-")
        );

        if config.force_close_processes {
            let names =
                terminator::candidate_process_names(&record.display_name, &config.process_names);
            tracing::info!("Stopping processes: {}", names.join(", "));
            let report =
                terminator::terminate_processes(&mut self.processes, &names, config.grace_period)
                    .await;
            tracing::info!(
                "Process cleanup: {} closed, {} killed, {} failed",
                report.closed,
                report.killed,
                report.failures.len()
            );
        }

        let plan = match plan::derive_plan(
            &record,
            config.extra_arguments.as_deref(),
            &config.log_dir,
        ) {
            Ok(plan) => plan,
            Err(e) => {
                tracing::error!("{}", e);
                return Outcome::UninstallFailed;
            }
        };

        let outcome = match executor::run_plan(&self.launcher, &plan, config.timeout).await {
            ExecutionReport::Completed {
                class: ExitClass::Success,
                ..
            } => Outcome::UninstallSucceeded {
                restart_required: false,
            },
            ExecutionReport::Completed {
                class: ExitClass::SuccessRestartRequired,
                ..
            } => Outcome::UninstallSucceeded {
                restart_required: true,
            },
            ExecutionReport::Completed {
                class: ExitClass::Failure,
                ..
            }
            | ExecutionReport::LaunchFailed(_) => Outcome::UninstallFailed,
            ExecutionReport::TimedOut => Outcome::UninstallTimedOut,
        };

        if !outcome.is_success() {
            return outcome;
        }

        if config.verify_after_uninstall
            && !verify_removal(&self.sources, criteria, config.settle_delay).await
        {
            // 程序仍登记在册，保留安装目录以便下次运行还能正常卸载
            return Outcome::VerificationFailed;
        }

        if config.remove_leftovers {
            match record.install_location.as_deref() {
                Some(location) => {
                    cleaner::remove_install_location(location);
                }
                None => tracing::debug!("No install location recorded, nothing to clean"),
            }
        }

        outcome
    }
}

/// 等待清单刷新后重新查找，找不到即验证通过
pub async fn verify_removal(
    sources: &[Box<dyn InventorySource>],
    criteria: &MatchCriteria,
    settle_delay: Duration,
) -> bool {
    tracing::info!(
        "Waiting {}s before verifying removal",
        settle_delay.as_secs()
    );
    tokio::time::sleep(settle_delay).await;

    match locator::locate(sources, criteria).into_first() {
        Some(record) => {
            tracing::error!(
                "Verification failed: '{}' is still installed",
                record.display_name
            );
            false
        }
        None => {
            tracing::info!("Verified: '{}' is no longer installed", criteria.display_name);
            true
        }
    }
}
