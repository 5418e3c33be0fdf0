//! 卸载后残留的安装目录清理

pub mod models;
pub mod safety;

use std::path::Path;

use crate::modules::common::utils;
use models::CleanResult;

/// 删除安装目录（卸载程序没有删干净时）
pub fn remove_install_location(location: &str) -> CleanResult {
    let location = location.trim().trim_matches('"');

    if let Err(e) = safety::pre_delete_check(location) {
        tracing::warn!("Skipping leftover cleanup: {}", e);
        return CleanResult::failed(location, e);
    }

    let path = Path::new(location);
    if !path.exists() {
        // 目标已不存在，视为成功
        return CleanResult::removed(location, 0);
    }

    // 解析符号链接后再检查一次，防止链接指向系统目录
    let resolved = match path.canonicalize() {
        Ok(resolved) => resolved,
        Err(e) => {
            tracing::warn!("Skipping leftover cleanup, cannot resolve {}: {}", location, e);
            return CleanResult::failed(location, e);
        }
    };
    if let Err(e) = safety::pre_delete_check(&resolved.to_string_lossy()) {
        tracing::warn!("Skipping leftover cleanup: {}", e);
        return CleanResult::failed(location, e);
    }

    let bytes_freed = utils::calculate_dir_size(path).unwrap_or(0);
    let result = if path.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };

    match result {
        Ok(()) => {
            tracing::info!(
                "Removed leftover install location {} ({})",
                location,
                utils::format_size(bytes_freed)
            );
            CleanResult::removed(location, bytes_freed)
        }
        Err(e) => {
            tracing::error!("Failed to remove leftover install location {}: {}", location, e);
            CleanResult::failed(location, e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_leftover_directory_and_reports_size() {
        let root = tempfile::tempdir().unwrap();
        let install = root.path().join("Mozilla Firefox");
        std::fs::create_dir_all(install.join("browser")).unwrap();
        std::fs::write(install.join("browser").join("omni.ja"), vec![7u8; 4096]).unwrap();

        let result = remove_install_location(&install.to_string_lossy());

        assert!(result.success);
        assert_eq!(result.bytes_freed, 4096);
        assert!(!install.exists());
    }

    #[test]
    fn missing_directory_counts_as_removed() {
        let root = tempfile::tempdir().unwrap();
        let gone = root.path().join("already-gone");
        let result = remove_install_location(&format!("\"{}\"", gone.display()));
        assert!(result.success);
        assert_eq!(result.bytes_freed, 0);
    }

    #[test]
    fn relative_location_is_refused_and_left_alone() {
        // 在当前目录下建目录，用相对路径引用它
        let root = tempfile::tempdir_in(".").unwrap();
        let victim = root.path().join("drivers");
        std::fs::create_dir_all(&victim).unwrap();
        std::fs::write(victim.join("keep.sys"), b"x").unwrap();
        assert!(victim.is_relative());

        let result = remove_install_location(&victim.to_string_lossy());

        assert!(!result.success);
        assert!(result.error.unwrap().contains("protected"));
        assert!(victim.join("keep.sys").exists());
    }

    #[cfg(unix)]
    #[test]
    fn link_into_protected_tree_is_refused() {
        let root = tempfile::tempdir().unwrap();
        let link = root.path().join("Demo");
        std::os::unix::fs::symlink("/", &link).unwrap();

        let result = remove_install_location(&link.to_string_lossy());

        assert!(!result.success);
        assert!(link.exists());
    }

    #[test]
    fn protected_locations_are_refused() {
        let result = remove_install_location(r"C:\Windows\System32");
        assert!(!result.success);
        assert!(result.error.unwrap().contains("protected"));
    }
}
