//! remediate 命令 - 查找、结束进程、卸载并验证

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::{ArgAction, Parser};

use super::CriteriaArgs;
use crate::modules::common::config::{
    RemediationConfig, DEFAULT_GRACE_SECS, DEFAULT_SETTLE_SECS, DEFAULT_TIMEOUT_SECS,
};
use crate::modules::executor::launcher::ProcessLauncher;
use crate::modules::locator::registry;
use crate::modules::orchestrator::Orchestrator;
use crate::modules::terminator::system::SystemProcessTable;

#[derive(Parser, Debug)]
pub struct RemediateCommand {
    #[command(flatten)]
    pub criteria: CriteriaArgs,

    /// 卸载超时时间 (秒)
    #[arg(long, env = "REMEDIATE_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// 卸载前结束程序进程
    #[arg(long, env = "REMEDIATE_FORCE_CLOSE", default_value_t = true, action = ArgAction::Set)]
    pub force_close: bool,

    /// 要结束的进程名 (逗号分隔，留空则按显示名称推测)
    #[arg(long = "process", env = "REMEDIATE_PROCESS_NAMES", value_delimiter = ',')]
    pub processes: Vec<String>,

    /// 追加到卸载命令末尾的参数
    #[arg(long, env = "REMEDIATE_EXTRA_ARGS", allow_hyphen_values = true)]
    pub extra_args: Option<String>,

    /// 卸载后重新查找以确认已移除
    #[arg(long, env = "REMEDIATE_VERIFY", default_value_t = true, action = ArgAction::Set)]
    pub verify: bool,

    /// 请求关闭后等待进程退出的时间 (秒)
    #[arg(long, env = "REMEDIATE_GRACE", default_value_t = DEFAULT_GRACE_SECS)]
    pub grace: u64,

    /// 验证前等待注册表刷新的时间 (秒)
    #[arg(long, env = "REMEDIATE_SETTLE", default_value_t = DEFAULT_SETTLE_SECS)]
    pub settle: u64,

    /// 卸载成功后删除残留的安装目录
    #[arg(long, env = "REMEDIATE_REMOVE_LEFTOVERS")]
    pub remove_leftovers: bool,
}

impl RemediateCommand {
    pub fn into_config(self, log_dir: PathBuf) -> RemediationConfig {
        let mut config = RemediationConfig::new(self.criteria.to_criteria(), log_dir);
        config.timeout = Duration::from_secs(self.timeout);
        config.force_close_processes = self.force_close;
        config.process_names = self.processes;
        config.extra_arguments = self.extra_args;
        config.verify_after_uninstall = self.verify;
        config.grace_period = Duration::from_secs(self.grace);
        config.settle_delay = Duration::from_secs(self.settle);
        config.remove_leftovers = self.remove_leftovers;
        config
    }
}

pub async fn execute(cmd: RemediateCommand, log_dir: &Path) -> Result<ExitCode> {
    let config = cmd.into_config(log_dir.to_path_buf());

    let mut orchestrator = Orchestrator::new(
        &config,
        registry::default_sources(),
        SystemProcessTable::new(),
        ProcessLauncher,
    );
    let outcome = orchestrator.run().await?;

    Ok(ExitCode::from(outcome.exit_code()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> RemediateCommand {
        let mut argv = vec!["remediate"];
        argv.extend_from_slice(args);
        RemediateCommand::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_match_remediation_conventions() {
        let config = parse(&["--name", "Zoom"]).into_config(PathBuf::from("logs"));
        assert_eq!(config.criteria.display_name, "Zoom");
        assert!(!config.criteria.exact_match);
        assert_eq!(config.timeout, Duration::from_secs(300));
        assert!(config.force_close_processes);
        assert!(config.verify_after_uninstall);
        assert!(config.process_names.is_empty());
        assert_eq!(config.extra_arguments, None);
    }

    #[test]
    fn flags_map_onto_config() {
        let config = parse(&[
            "--name",
            "Mozilla Firefox",
            "--exact",
            "--publisher",
            "Mozilla",
            "--timeout",
            "60",
            "--force-close",
            "false",
            "--process",
            "firefox,crashreporter",
            "--extra-args",
            "-ms",
            "--verify",
            "false",
            "--remove-leftovers",
        ])
        .into_config(PathBuf::from("logs"));

        assert!(config.criteria.exact_match);
        assert_eq!(config.criteria.publisher.as_deref(), Some("Mozilla"));
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(!config.force_close_processes);
        assert_eq!(config.process_names, vec!["firefox", "crashreporter"]);
        assert_eq!(config.extra_arguments.as_deref(), Some("-ms"));
        assert!(!config.verify_after_uninstall);
        assert!(config.remove_leftovers);
    }

    #[test]
    fn name_is_required() {
        assert!(RemediateCommand::try_parse_from(["remediate", "--timeout", "5"]).is_err());
    }
}
