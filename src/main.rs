use std::path::PathBuf;
use std::process::ExitCode;

use app_remediator_lib::commands;
use app_remediator_lib::modules::common::logging;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "app-remediator")]
#[command(about = "Windows 程序卸载修复工具", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: commands::Command,

    /// 详细输出模式
    #[arg(short, long, global = true)]
    verbose: bool,

    /// 日志目录
    #[arg(long, global = true, env = "REMEDIATE_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_dir = cli.log_dir.clone().unwrap_or_else(logging::default_log_dir);
    // guard 在 main 返回时 drop，确保日志写入文件
    let _guard = logging::init_logging(cli.verbose, &log_dir);

    let result = match cli.command {
        commands::Command::Remediate(cmd) => commands::remediate::execute(cmd, &log_dir).await,
        commands::Command::List(cmd) => commands::list::execute(cmd).await.map(|_| ExitCode::SUCCESS),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("Unhandled error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
