use serde::Serialize;

/// 卸载注册表中读出的一条已安装程序记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationRecord {
    pub display_name: String,
    pub publisher: Option<String>,
    /// 卸载键名，MSI 安装时即为产品 GUID
    pub product_id: Option<String>,
    pub uninstall_string: Option<String>,
    pub quiet_uninstall_string: Option<String>,
    pub display_version: Option<String>,
    pub install_location: Option<String>,
    /// 记录来自哪个清单源
    pub source: String,
}

impl ApplicationRecord {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            publisher: None,
            product_id: None,
            uninstall_string: None,
            quiet_uninstall_string: None,
            display_version: None,
            install_location: None,
            source: String::new(),
        }
    }

    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = Some(publisher.into());
        self
    }

    pub fn with_product_id(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    pub fn with_uninstall_string(mut self, uninstall_string: impl Into<String>) -> Self {
        self.uninstall_string = Some(uninstall_string.into());
        self
    }

    pub fn with_quiet_uninstall_string(mut self, quiet: impl Into<String>) -> Self {
        self.quiet_uninstall_string = Some(quiet.into());
        self
    }

    pub fn with_install_location(mut self, location: impl Into<String>) -> Self {
        self.install_location = Some(location.into());
        self
    }
}

/// 查找条件
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchCriteria {
    pub display_name: String,
    pub publisher: Option<String>,
    pub product_id: Option<String>,
    pub exact_match: bool,
}

impl MatchCriteria {
    pub fn substring(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            ..Self::default()
        }
    }

    pub fn exact(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            exact_match: true,
            ..Self::default()
        }
    }

    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = Some(publisher.into());
        self
    }

    pub fn with_product_id(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    /// 名称、发布者、产品 ID 三个条件同时满足才算匹配，空过滤条件视为不限
    ///
    /// 所有比较都不区分大小写。
    pub fn matches(&self, record: &ApplicationRecord) -> bool {
        let name = record.display_name.to_lowercase();
        let target = self.display_name.to_lowercase();
        let name_ok = if self.exact_match {
            name == target
        } else {
            name.contains(&target)
        };
        if !name_ok {
            return false;
        }

        if let Some(publisher) = non_empty(self.publisher.as_deref()) {
            let publisher = publisher.to_lowercase();
            let found = record
                .publisher
                .as_deref()
                .is_some_and(|p| p.to_lowercase().contains(&publisher));
            if !found {
                return false;
            }
        }

        if let Some(product_id) = non_empty(self.product_id.as_deref()) {
            let found = record
                .product_id
                .as_deref()
                .is_some_and(|id| id.to_lowercase() == product_id.to_lowercase());
            if !found {
                return false;
            }
        }

        true
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// 单个清单源的读取诊断
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDiagnostic {
    pub source: String,
    pub entries: usize,
    pub error: Option<String>,
}

/// 一次查找的结果及各清单源的诊断信息
#[derive(Debug, Clone, Default)]
pub struct LocateReport {
    pub matches: Vec<ApplicationRecord>,
    pub diagnostics: Vec<SourceDiagnostic>,
}

impl LocateReport {
    pub fn first(&self) -> Option<&ApplicationRecord> {
        self.matches.first()
    }

    pub fn into_first(self) -> Option<ApplicationRecord> {
        self.matches.into_iter().next()
    }

    pub fn failed_sources(&self) -> impl Iterator<Item = &SourceDiagnostic> {
        self.diagnostics.iter().filter(|d| d.error.is_some())
    }
}
