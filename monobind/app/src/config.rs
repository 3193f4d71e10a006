use common::SessionConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HostConfig {
    /// Mono runtime to load, e.g. `libmonosgen-2.0.so`.
    #[serde(default = "default_library_path")]
    pub library_path: PathBuf,

    /// Create a root domain before looking anything up. Leave off when the
    /// runtime is already running in this process.
    #[serde(default = "default_init_jit")]
    pub init_jit: bool,

    #[serde(default = "default_domain_name")]
    pub domain_name: String,

    /// Image to search; corlib when unset.
    pub image: Option<String>,

    /// `Namespace.Name` entries dumped when none are given on the command line.
    pub classes: Vec<String>,

    pub session: SessionConfig,
}

fn default_library_path() -> PathBuf {
    PathBuf::from(monohost::default_library_name())
}

fn default_init_jit() -> bool {
    true
}

fn default_domain_name() -> String {
    "monobind".to_string()
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            library_path: default_library_path(),
            init_jit: default_init_jit(),
            domain_name: default_domain_name(),
            image: None,
            classes: Vec::new(),
            session: SessionConfig::default(),
        }
    }
}

/// Splits `Namespace.Name` at the last dot. Nested classes keep their `/`.
pub fn split_class_name(full_name: &str) -> (&str, &str) {
    match full_name.rsplit_once('.') {
        Some((namespace, name)) => (namespace, name),
        None => ("", full_name),
    }
}
