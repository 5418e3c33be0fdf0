/// 删除操作结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanResult {
    pub path: String,
    pub success: bool,
    pub error: Option<String>,
    pub bytes_freed: u64,
}

impl CleanResult {
    pub fn removed(path: &str, bytes_freed: u64) -> Self {
        Self {
            path: path.to_string(),
            success: true,
            error: None,
            bytes_freed,
        }
    }

    pub fn failed(path: &str, error: impl ToString) -> Self {
        Self {
            path: path.to_string(),
            success: false,
            error: Some(error.to_string()),
            bytes_freed: 0,
        }
    }
}
