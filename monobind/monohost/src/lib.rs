//! In-process Mono runtime backend

mod hosting;
mod marshaling;
mod runtime;

pub use hosting::{default_library_name, load_mono_library};
pub use runtime::NativeRuntime;

/// Errors specific to loading the Mono runtime
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("Failed to load Mono runtime library {path}: {reason}")]
    RuntimeLoad { path: String, reason: String },
}
