use super::models::ApplicationRecord;
use super::InventorySource;
use crate::modules::common::error::RemediationError;

const UNINSTALL_NATIVE: &str = r"SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall";
const UNINSTALL_WOW64: &str = r"SOFTWARE\WOW6432Node\Microsoft\Windows\CurrentVersion\Uninstall";

/// HKLM 下的一个卸载注册表分支
#[derive(Debug, Clone)]
pub struct RegistryHive {
    label: String,
    path: &'static str,
}

impl RegistryHive {
    pub fn native() -> Self {
        Self {
            label: format!(r"HKLM\{}", UNINSTALL_NATIVE),
            path: UNINSTALL_NATIVE,
        }
    }

    pub fn compatibility() -> Self {
        Self {
            label: format!(r"HKLM\{}", UNINSTALL_WOW64),
            path: UNINSTALL_WOW64,
        }
    }
}

/// 默认扫描顺序: 原生分支优先，其次 32 位兼容分支
pub fn default_sources() -> Vec<Box<dyn InventorySource>> {
    vec![
        Box::new(RegistryHive::native()),
        Box::new(RegistryHive::compatibility()),
    ]
}

impl InventorySource for RegistryHive {
    fn name(&self) -> &str {
        &self.label
    }

    fn read_entries(&self) -> Result<Vec<ApplicationRecord>, RemediationError> {
        #[cfg(windows)]
        {
            read_hive(self)
        }

        #[cfg(not(windows))]
        {
            Err(RemediationError::Inventory {
                source_name: self.label.clone(),
                message: format!("registry path {} is only available on Windows", self.path),
            })
        }
    }
}

#[cfg(windows)]
fn read_hive(hive: &RegistryHive) -> Result<Vec<ApplicationRecord>, RemediationError> {
    use winreg::enums::{HKEY_LOCAL_MACHINE, KEY_READ};
    use winreg::RegKey;

    let root = RegKey::predef(HKEY_LOCAL_MACHINE)
        .open_subkey_with_flags(hive.path, KEY_READ)
        .map_err(|e| RemediationError::Inventory {
            source_name: hive.label.clone(),
            message: e.to_string(),
        })?;

    let mut records = Vec::new();
    for key_name in root.enum_keys().filter_map(|k| k.ok()) {
        match root.open_subkey(&key_name) {
            Ok(subkey) => {
                if let Some(record) = parse_registry_entry(&subkey, &key_name, &hive.label) {
                    records.push(record);
                }
            }
            Err(e) => {
                tracing::debug!("Skipping {}\\{}: {}", hive.label, key_name, e);
            }
        }
    }

    Ok(records)
}

/// 解析单个卸载键，没有 DisplayName 的键不是可见程序
#[cfg(windows)]
fn parse_registry_entry(
    subkey: &winreg::RegKey,
    key_name: &str,
    source: &str,
) -> Option<ApplicationRecord> {
    let name: String = subkey.get_value("DisplayName").ok()?;
    if name.trim().is_empty() {
        return None;
    }

    let mut record = ApplicationRecord::new(name);
    record.product_id = Some(key_name.to_string());
    record.publisher = subkey.get_value("Publisher").ok();
    record.uninstall_string = subkey.get_value("UninstallString").ok();
    record.quiet_uninstall_string = subkey.get_value("QuietUninstallString").ok();
    record.display_version = subkey.get_value("DisplayVersion").ok();
    record.install_location = subkey
        .get_value::<String, _>("InstallLocation")
        .ok()
        .filter(|l| !l.trim().is_empty());
    record.source = source.to_string();

    Some(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sources_scan_native_before_compatibility() {
        let sources = default_sources();
        assert_eq!(sources.len(), 2);
        assert!(!sources[0].name().contains("WOW6432Node"));
        assert!(sources[1].name().contains("WOW6432Node"));
    }

    #[cfg(not(windows))]
    #[test]
    fn registry_is_reported_unreadable_off_windows() {
        let err = RegistryHive::native().read_entries().unwrap_err();
        assert!(matches!(err, RemediationError::Inventory { .. }));
    }
}
