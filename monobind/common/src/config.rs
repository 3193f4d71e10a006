use anyhow::{Context, Result};
use log::info;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// How the registry holds on to handles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Keep every handle until the session detaches.
    #[default]
    #[serde(alias = "strong")]
    Strong,
    /// Keep handles only while a caller holds them; re-created on demand.
    #[serde(alias = "weak")]
    Weak,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    pub cache_policy: CachePolicy,

    /// Ask the runtime for a message when a checked lookup fails.
    #[serde(default = "default_decode_lookup_errors")]
    pub decode_lookup_errors: bool,
}

fn default_decode_lookup_errors() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cache_policy: CachePolicy::default(),
            decode_lookup_errors: default_decode_lookup_errors(),
        }
    }
}

/// Reads a JSON config, writing out the defaults if the file is missing.
pub fn load_or_create<T>(path: &Path) -> Result<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    if path.exists() {
        info!("Loading config from {:?}", path);
        let file = File::open(path).with_context(|| format!("Failed to open config {:?}", path))?;
        let config = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    } else {
        info!("Config not found. Creating default at {:?}", path);
        let config = T::default();
        save(path, &config)?;
        Ok(config)
    }
}

pub fn save<T: Serialize>(path: &Path, config: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config dir: {:?}", parent))?;
        }
    }
    let file = File::create(path).with_context(|| format!("Failed to create config {:?}", path))?;
    serde_json::to_writer_pretty(BufWriter::new(file), config).context("Failed to serialize config")?;
    Ok(())
}
