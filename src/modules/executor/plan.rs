//! 卸载计划推导
//!
//! 优先级固定: MSI 产品 GUID > QuietUninstallString > UninstallString(补静默开关)。
//! 额外参数总是追加在所选计划末尾。

use std::path::Path;
use std::sync::OnceLock;

use chrono::Local;
use regex::Regex;

use super::models::{PlanSource, UninstallPlan};
use crate::modules::common::error::RemediationError;
use crate::modules::common::utils;
use crate::modules::locator::models::ApplicationRecord;

/// 已知的静默开关，按子串匹配（不区分大小写）
const SILENT_SWITCHES: &[&str] = &["/S", "/SILENT", "/VERYSILENT", "/q", "/quiet"];

/// 原始卸载命令缺少静默开关时追加的默认参数
const DEFAULT_SILENT_ARGS: &str = "/S /SILENT";

pub const MSIEXEC: &str = "msiexec.exe";

/// 拆分后的命令行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub command: String,
    pub arguments: String,
    pub has_silent_switch: bool,
}

/// 拆分卸载命令行
///
/// 以引号开头时，引号内为命令、其余部分为参数；否则按第一个空格拆分。
/// 注意静默开关检测是子串匹配，参数里的路径包含 `/q` 之类的片段也会被当作已静默。
pub fn parse_command_line(line: &str) -> ParsedCommand {
    let line = line.trim();

    let (command, arguments) = match line.strip_prefix('"') {
        Some(rest) => match rest.find('"') {
            Some(end) => (&rest[..end], rest[end + 1..].trim()),
            // 引号未闭合，整行视为命令
            None => (rest, ""),
        },
        None => match line.split_once(' ') {
            Some((command, arguments)) => (command, arguments.trim()),
            None => (line, ""),
        },
    };

    ParsedCommand {
        command: command.to_string(),
        arguments: arguments.to_string(),
        has_silent_switch: contains_silent_switch(arguments),
    }
}

fn contains_silent_switch(arguments: &str) -> bool {
    let lowered = arguments.to_lowercase();
    SILENT_SWITCHES
        .iter()
        .any(|switch| lowered.contains(&switch.to_lowercase()))
}

/// 是否为 `{8-4-4-4-12}` 形式的安装程序 GUID
pub fn is_installer_guid(id: &str) -> bool {
    static GUID: OnceLock<Option<Regex>> = OnceLock::new();
    GUID.get_or_init(|| {
        Regex::new(
            r"^\{[0-9A-Fa-f]{8}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{12}\}$",
        )
        .ok()
    })
    .as_ref()
    .is_some_and(|re| re.is_match(id))
}

/// 根据程序记录推导卸载计划
pub fn derive_plan(
    record: &ApplicationRecord,
    extra_arguments: Option<&str>,
    msi_log_dir: &Path,
) -> Result<UninstallPlan, RemediationError> {
    let mut plan = if let Some(product_id) = record
        .product_id
        .as_deref()
        .filter(|id| is_installer_guid(id))
    {
        let log_path = msi_log_dir.join(format!(
            "msi-uninstall-{}-{}.log",
            utils::file_name_fragment(product_id),
            Local::now().format("%Y%m%d-%H%M%S")
        ));
        UninstallPlan {
            command: MSIEXEC.to_string(),
            arguments: format!(
                "/x {} /qn /norestart /L*v \"{}\"",
                product_id,
                log_path.display()
            ),
            source: PlanSource::InstallerGuid,
        }
    } else if let Some(quiet) = non_blank(record.quiet_uninstall_string.as_deref()) {
        let parsed = parse_command_line(quiet);
        UninstallPlan {
            command: parsed.command,
            arguments: parsed.arguments,
            source: PlanSource::QuietString,
        }
    } else if let Some(raw) = non_blank(record.uninstall_string.as_deref()) {
        let parsed = parse_command_line(raw);
        let arguments = if parsed.has_silent_switch {
            parsed.arguments
        } else {
            append_arguments(&parsed.arguments, DEFAULT_SILENT_ARGS)
        };
        UninstallPlan {
            command: parsed.command,
            arguments,
            source: PlanSource::UninstallString,
        }
    } else {
        return Err(RemediationError::NoUninstallPlan(
            record.display_name.clone(),
        ));
    };

    if let Some(extra) = non_blank(extra_arguments) {
        plan.arguments = append_arguments(&plan.arguments, extra.trim());
    }

    Ok(plan)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn append_arguments(base: &str, extra: &str) -> String {
    if base.is_empty() {
        extra.to_string()
    } else {
        format!("{} {}", base, extra)
    }
}
