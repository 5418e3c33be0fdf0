use anyhow::Result;
use clap::Parser;

use super::CriteriaArgs;
use crate::modules::common::utils::truncate_string;
use crate::modules::locator::{self, models::ApplicationRecord, registry};

#[derive(Parser, Debug)]
pub struct ListCommand {
    #[command(flatten)]
    pub criteria: CriteriaArgs,

    /// 输出格式 (table/json)
    #[arg(long, default_value = "table")]
    pub format: String,
}

pub async fn execute(cmd: ListCommand) -> Result<()> {
    let criteria = cmd.criteria.to_criteria();
    tracing::info!("Listing installed programs matching '{}'", criteria.display_name);

    let report = locator::locate_all(&registry::default_sources(), &criteria);
    for failed in report.failed_sources() {
        tracing::warn!(
            "Skipped {}: {}",
            failed.source,
            failed.error.as_deref().unwrap_or_default()
        );
    }

    match cmd.format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report.matches)?);
        }
        _ => {
            print_table(&report.matches);
        }
    }

    Ok(())
}

fn print_table(records: &[ApplicationRecord]) {
    println!("\n{}", "=".repeat(122));
    println!(
        "{:<40} {:<25} {:<15} {:<40}",
        "Name", "Publisher", "Version", "Product ID"
    );
    println!("{}", "=".repeat(122));

    for record in records {
        println!(
            "{:<40} {:<25} {:<15} {:<40}",
            truncate_string(&record.display_name, 39),
            truncate_string(record.publisher.as_deref().unwrap_or_default(), 24),
            truncate_string(record.display_version.as_deref().unwrap_or_default(), 14),
            truncate_string(record.product_id.as_deref().unwrap_or_default(), 40)
        );
    }

    println!("{}", "=".repeat(122));
    println!("Total: {} program(s)\n", records.len());
}
