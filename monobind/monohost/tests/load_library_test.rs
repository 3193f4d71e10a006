use api::{ForeignRuntime, NativeValue};
use common::natives;
use log::info;
use monohost::{load_mono_library, NativeRuntime};
use std::path::PathBuf;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// Set MONO_LIBRARY to a libmonosgen/mono-2.0 build to run these.
fn mono_library() -> Option<PathBuf> {
    match std::env::var_os("MONO_LIBRARY") {
        Some(path) => Some(PathBuf::from(path)),
        None => {
            info!("MONO_LIBRARY not set, skipping");
            None
        }
    }
}

#[test]
fn test_exports_resolve() {
    init_logger();
    let Some(path) = mono_library() else { return };

    let library = load_mono_library(&path).expect("Failed to load Mono runtime");
    let runtime = NativeRuntime::new(library);
    let missing = runtime.missing_symbols(natives::ALL);
    assert!(missing.is_empty(), "Runtime is missing exports: {:?}", missing);
}

#[test]
fn test_reload_reuses_library() {
    init_logger();
    let Some(path) = mono_library() else { return };

    let first = load_mono_library(&path).expect("Failed to load Mono runtime");
    let second = load_mono_library(&path).expect("Failed to load Mono runtime");
    assert!(std::ptr::eq(first, second));
}

#[test]
fn test_call_before_init() {
    init_logger();
    let Some(path) = mono_library() else { return };

    let runtime = NativeRuntime::load(&path).expect("Failed to load Mono runtime");
    // No domain yet, so there is no corlib either.
    let corlib = runtime
        .call(&natives::MONO_GET_CORLIB, &[])
        .expect("mono_get_corlib should be callable");
    assert_eq!(corlib, NativeValue::Pointer(api::Address::NULL));
}
