use libloading::Library;
use log::{info, warn};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

use crate::HostError;

static MONO_LIBRARY: OnceCell<(PathBuf, Library)> = OnceCell::new();

/// File name of the Mono runtime shipped with most hosts on this platform.
pub fn default_library_name() -> &'static str {
    if cfg!(windows) {
        "mono-2.0-bdwgc.dll"
    } else if cfg!(target_os = "macos") {
        "libmonosgen-2.0.dylib"
    } else {
        "libmonosgen-2.0.so"
    }
}

/// Load the Mono runtime library (once per process).
///
/// When the runtime is already loaded, the existing library is reused even if
/// a different path is requested.
pub fn load_mono_library(path: &Path) -> Result<&'static Library, HostError> {
    let (loaded_path, library) = MONO_LIBRARY.get_or_try_init(|| {
        // SAFETY: loading Mono runs no initialisers beyond its own.
        let library = unsafe { Library::new(path) }.map_err(|e| HostError::RuntimeLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        info!("Loaded Mono runtime from {:?}", path);
        Ok::<_, HostError>((path.to_path_buf(), library))
    })?;

    if loaded_path != path {
        warn!(
            "Mono runtime already loaded from {:?}, ignoring {:?}",
            loaded_path, path
        );
    }
    Ok(library)
}
