use std::path::Path;

/// 计算目录大小
pub fn calculate_dir_size(path: &Path) -> std::io::Result<u64> {
    if path.is_file() {
        return path.metadata().map(|m| m.len());
    }

    let mut size = 0u64;
    for entry in walkdir::WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
        if entry.file_type().is_file() {
            if let Ok(metadata) = entry.metadata() {
                size += metadata.len();
            }
        }
    }

    Ok(size)
}

/// 格式化文件大小
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// 把任意字符串变成可用作文件名的片段
pub fn file_name_fragment(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter_map(|c| match c {
            '{' | '}' => None,
            c if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' => Some(c),
            _ => Some('_'),
        })
        .collect();

    if cleaned.is_empty() {
        "unnamed".to_string()
    } else {
        cleaned
    }
}

/// 按字符截断（兼容中文等多字节字符）
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let chars: String = s.chars().take(max_len.saturating_sub(2)).collect();
        format!("{}..", chars)
    } else {
        s.to_string()
    }
}
