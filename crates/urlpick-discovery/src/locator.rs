use std::path::{Path, PathBuf};

/// Finds browser executables under ordered install base directories
pub struct ExecutableLocator {
    bases: Vec<PathBuf>,
}

impl ExecutableLocator {
    /// Create a locator searching the given bases, in order
    pub fn new(bases: Vec<PathBuf>) -> Self {
        Self { bases }
    }

    /// Create a locator searching a single explicit base directory
    pub fn with_base(base: PathBuf) -> Self {
        Self { bases: vec![base] }
    }

    /// Join `base/sub_path/exe_name` for each base in order and return the
    /// first candidate that exists as a file. Search order is significant.
    pub fn locate(&self, sub_path: &Path, exe_name: &str) -> Option<PathBuf> {
        for base in &self.bases {
            let candidate = base.join(sub_path).join(exe_name);
            if candidate.is_file() {
                tracing::debug!("Found executable: {}", candidate.display());
                return Some(candidate);
            }
        }
        None
    }
}

/// Platform default install bases, in precedence order
pub fn install_bases() -> Vec<PathBuf> {
    #[cfg(target_os = "windows")]
    return ["ProgramFiles", "ProgramFiles(x86)", "LOCALAPPDATA"]
        .iter()
        .filter_map(std::env::var_os)
        .map(PathBuf::from)
        .collect();

    #[cfg(target_os = "macos")]
    return vec![PathBuf::from("/Applications")];

    #[cfg(target_os = "linux")]
    return vec![
        PathBuf::from("/usr/bin"),
        PathBuf::from("/usr/local/bin"),
        PathBuf::from("/opt"),
    ];

    #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
    return Vec::new();
}
