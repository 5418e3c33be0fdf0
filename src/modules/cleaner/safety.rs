use std::ffi::OsString;
use std::path::Path;
use std::sync::OnceLock;

use crate::modules::common::error::RemediationError;

/// 这些目录及其所有子目录都不能删除，不区分盘符
const CRITICAL_TREES: &[&str] = &[
    r"\Windows",
    r"\Boot",
    r"\Recovery",
    r"\System Volume Information",
    r"\$Recycle.Bin",
];

/// 这些目录本身不能删除，但其下的程序目录可以，不区分盘符
const SHARED_ROOTS: &[&str] = &[
    r"\Program Files",
    r"\Program Files (x86)",
    r"\Program Files\Common Files",
    r"\Program Files (x86)\Common Files",
    r"\ProgramData",
];

/// 用户目录根；根本身和每个用户的配置文件目录都不能删除
const USERS_ROOT: &str = r"\Users";

const TREE_VARS: &[&str] = &["SystemRoot", "windir"];

const SHARED_VARS: &[&str] = &[
    "ProgramFiles",
    "ProgramFiles(x86)",
    "ProgramW6432",
    "CommonProgramFiles",
    "CommonProgramFiles(x86)",
    "ProgramData",
    "ALLUSERSPROFILE",
];

/// 当前系统上的受保护目录（来自环境变量，系统目录可能不在 C: 盘）
#[derive(Debug, Clone, Default)]
pub struct ProtectedRoots {
    trees: Vec<String>,
    shared: Vec<String>,
    user_roots: Vec<String>,
}

impl ProtectedRoots {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var_os(name))
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        let var = |name: &str| {
            lookup(name)
                .map(|value| normalize(&value.to_string_lossy()))
                .filter(|value| !value.is_empty())
        };

        let mut roots = Self {
            trees: TREE_VARS.iter().filter_map(|&name| var(name)).collect(),
            shared: SHARED_VARS.iter().filter_map(|&name| var(name)).collect(),
            user_roots: Vec::new(),
        };

        if let Some(drive) = var("SystemDrive") {
            roots.user_roots.push(format!("{}\\USERS", drive));
        }
        // %PUBLIC% 位于用户目录根之下，可以找到被迁移过的 Users 目录
        if let Some(public) = var("PUBLIC") {
            if let Some((parent, _)) = public.rsplit_once('\\') {
                roots.user_roots.push(parent.to_string());
            }
        }

        roots
    }

    /// 相对路径、含 `..` 的路径、盘符根目录、系统目录、共享根目录和用户配置文件目录都受保护
    pub fn is_protected(&self, path: &str) -> bool {
        let raw = path.trim().trim_matches('"');
        let normalized = normalize(raw);
        if normalized.is_empty() {
            return true;
        }

        // 盘符根目录，如 C: 或 D:\
        if normalized.len() == 2 && normalized.ends_with(':') {
            return true;
        }

        // 相对路径会按当前目录解析，而 SYSTEM 账户的当前目录通常是 System32
        if !Path::new(raw).is_absolute() && !has_drive_root(&normalized) {
            return true;
        }

        if normalized.split('\\').any(|part| part == "..") {
            return true;
        }

        let rest = strip_drive(&normalized);
        if rest.is_empty() {
            return true;
        }

        let in_tree = |candidate: &str, tree: &str| {
            candidate == tree || candidate.starts_with(&format!("{}\\", tree))
        };

        if CRITICAL_TREES
            .iter()
            .any(|tree| in_tree(rest, &normalize(tree)))
            || self.trees.iter().any(|tree| in_tree(&normalized, tree))
        {
            return true;
        }

        if SHARED_ROOTS.iter().any(|root| rest == normalize(root))
            || self.shared.iter().any(|root| normalized == *root)
        {
            return true;
        }

        is_user_profile(rest, &normalize(USERS_ROOT))
            || self
                .user_roots
                .iter()
                .any(|root| is_user_profile(&normalized, root))
    }
}

fn system_roots() -> &'static ProtectedRoots {
    static ROOTS: OnceLock<ProtectedRoots> = OnceLock::new();
    ROOTS.get_or_init(ProtectedRoots::from_env)
}

/// 检查路径是否受保护
pub fn is_protected_path(path: &str) -> bool {
    system_roots().is_protected(path)
}

/// 删除前检查
pub fn pre_delete_check(path: &str) -> Result<(), RemediationError> {
    if is_protected_path(path) {
        return Err(RemediationError::ProtectedPath(path.to_string()));
    }
    Ok(())
}

/// 用户目录根本身或其直接子目录
fn is_user_profile(candidate: &str, users_root: &str) -> bool {
    if candidate == users_root {
        return true;
    }
    candidate
        .strip_prefix(users_root)
        .and_then(|rest| rest.strip_prefix('\\'))
        .is_some_and(|child| !child.is_empty() && !child.contains('\\'))
}

/// `X:\...` 形式的绝对路径（在非 Windows 平台上 Path::is_absolute 不认这种写法）
fn has_drive_root(normalized: &str) -> bool {
    let bytes = normalized.as_bytes();
    bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'\\'
}

fn strip_drive(normalized: &str) -> &str {
    if has_drive_root(normalized) {
        &normalized[2..]
    } else {
        normalized
    }
}

fn normalize(path: &str) -> String {
    let path = path.trim().trim_matches('"').replace('/', "\\");
    // canonicalize 在 Windows 上返回 \\?\ 前缀
    let path = match path.strip_prefix(r"\\?\") {
        Some(rest) => match rest.strip_prefix(r"UNC\") {
            Some(unc) => format!(r"\\{}", unc),
            None => rest.to_string(),
        },
        None => path,
    };

    let mut normalized = path;
    while normalized.contains("\\\\") {
        normalized = normalized.replace("\\\\", "\\");
    }
    normalized.trim_end_matches('\\').to_uppercase()
}
