use std::fmt;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 日志文件名前缀，滚动后为 `remediation.log.YYYY-MM-DD`
pub const LOG_FILE_PREFIX: &str = "remediation.log";

/// 日志行格式: `[2024-01-15 10:30:00] [INFO] message`
#[derive(Debug, Clone, Copy, Default)]
pub struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(
            writer,
            "[{}] [{}] ",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            level_label(*event.metadata().level())
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn level_label(level: Level) -> &'static str {
    match level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARN",
        Level::INFO => "INFO",
        Level::DEBUG => "DEBUG",
        Level::TRACE => "TRACE",
    }
}

/// 初始化日志: 按天滚动的文件 + 带颜色的 stderr
///
/// 返回的 guard 必须在进程退出前保持存活，drop 时会刷新缓冲的日志行。
pub fn init_logging(verbose: bool, log_dir: &Path) -> Option<WorkerGuard> {
    let level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::new(format!(
        "app_remediator_lib={level},app_remediator={level},warn"
    ));

    // 日志目录不可用时仍然保留控制台输出
    if let Err(e) = std::fs::create_dir_all(log_dir) {
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer())
            .try_init();
        tracing::warn!("Cannot create log directory {}: {}", log_dir.display(), e);
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .event_format(LineFormat)
        .with_writer(non_blocking);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer())
        .try_init();

    Some(guard)
}

fn stderr_layer<S>() -> impl tracing_subscriber::Layer<S> + Send + Sync
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(true)
}

pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("app-remediator")
        .join("logs")
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn line_format_writes_bracketed_timestamp_and_level() {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .event_format(LineFormat)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!("disk {} almost full", "C:");
        });

        let bytes = capture.0.lock().unwrap().clone();
        let line = String::from_utf8(bytes).unwrap();
        assert!(line.starts_with('['));
        assert!(line.contains("] [WARN] disk C: almost full"));
        assert!(line.ends_with('\n'));
    }

    #[test]
    fn init_logging_falls_back_to_stderr_when_directory_is_unusable() {
        let root = tempfile::tempdir().unwrap();
        let blocker = root.path().join("not-a-dir");
        std::fs::write(&blocker, b"").unwrap();

        assert!(init_logging(false, &blocker).is_none());

        let log_dir = root.path().join("logs");
        let guard = init_logging(true, &log_dir);
        assert!(guard.is_some());
        assert!(log_dir.is_dir());
    }

    #[test]
    fn default_log_dir_ends_with_app_folder() {
        let dir = default_log_dir();
        assert!(dir.ends_with(Path::new("app-remediator").join("logs")));
    }
}
