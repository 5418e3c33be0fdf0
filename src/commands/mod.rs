pub mod list;
pub mod remediate;

use clap::{Args, Subcommand};

use crate::modules::locator::models::MatchCriteria;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 查找并卸载程序，可选结束进程与卸载后验证
    Remediate(remediate::RemediateCommand),

    /// 列出符合条件的已安装程序
    List(list::ListCommand),
}

/// 查找条件参数，两个子命令共用
#[derive(Args, Debug, Clone)]
pub struct CriteriaArgs {
    /// 程序显示名称
    #[arg(long = "name", env = "REMEDIATE_APP_NAME")]
    pub name: String,

    /// 发布者 (子串匹配)
    #[arg(long, env = "REMEDIATE_PUBLISHER")]
    pub publisher: Option<String>,

    /// 产品 ID / 卸载键名 (完全匹配)
    #[arg(long, env = "REMEDIATE_PRODUCT_ID")]
    pub product_id: Option<String>,

    /// 显示名称完全匹配 (默认为子串匹配，两者都不区分大小写)
    #[arg(long, env = "REMEDIATE_EXACT_MATCH")]
    pub exact: bool,
}

impl CriteriaArgs {
    pub fn to_criteria(&self) -> MatchCriteria {
        MatchCriteria {
            display_name: self.name.clone(),
            publisher: self.publisher.clone(),
            product_id: self.product_id.clone(),
            exact_match: self.exact,
        }
    }
}
