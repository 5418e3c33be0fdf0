pub mod models;
pub mod registry;

use crate::modules::common::error::RemediationError;
use models::{ApplicationRecord, LocateReport, MatchCriteria, SourceDiagnostic};

/// 已安装程序清单源（卸载注册表分支等）
pub trait InventorySource {
    fn name(&self) -> &str;

    /// 每次调用都重新读取，不做缓存
    fn read_entries(&self) -> Result<Vec<ApplicationRecord>, RemediationError>;
}

/// 按顺序扫描清单源，返回第一条匹配记录
pub fn locate(sources: &[Box<dyn InventorySource>], criteria: &MatchCriteria) -> LocateReport {
    scan(sources, criteria, true)
}

/// 返回所有清单源中的全部匹配记录
pub fn locate_all(sources: &[Box<dyn InventorySource>], criteria: &MatchCriteria) -> LocateReport {
    scan(sources, criteria, false)
}

fn scan(
    sources: &[Box<dyn InventorySource>],
    criteria: &MatchCriteria,
    first_only: bool,
) -> LocateReport {
    let mut report = LocateReport::default();

    for source in sources {
        // 单个源读取失败只记录，按空源处理
        let entries = match source.read_entries() {
            Ok(entries) => entries,
            Err(e) => {
                tracing::error!("Failed to read inventory source {}: {}", source.name(), e);
                report.diagnostics.push(SourceDiagnostic {
                    source: source.name().to_string(),
                    entries: 0,
                    error: Some(e.to_string()),
                });
                continue;
            }
        };

        tracing::debug!("Inventory source {} has {} entries", source.name(), entries.len());
        report.diagnostics.push(SourceDiagnostic {
            source: source.name().to_string(),
            entries: entries.len(),
            error: None,
        });

        for mut record in entries.into_iter().filter(|r| criteria.matches(r)) {
            if record.source.is_empty() {
                record.source = source.name().to_string();
            }
            report.matches.push(record);
            if first_only {
                return report;
            }
        }
    }

    report
}
