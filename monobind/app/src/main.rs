mod config;
mod dump;

use anyhow::{bail, Context, Result};
use common::natives::MONO_JIT_INIT;
use common::{MonoClass, MonoImage, NativeValue, Session};
use config::{split_class_name, HostConfig};
use log::{debug, info, trace, warn};
use monohost::NativeRuntime;
use std::path::{Path, PathBuf};
use std::sync::Arc;

struct Args {
    config: PathBuf,
    script: Option<PathBuf>,
    classes: Vec<String>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config: PathBuf::from("monobind.json"),
        script: None,
        classes: Vec::new(),
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => args.config = iter.next().context("--config needs a path")?.into(),
            "--script" => args.script = Some(iter.next().context("--script needs a path")?.into()),
            _ => args.classes.push(arg),
        }
    }
    Ok(args)
}

fn init_domain(session: &Session, domain_name: &str) -> Result<()> {
    let name = session.runtime().alloc_utf8(domain_name)?;
    let domain = session.invoke(&MONO_JIT_INIT, &[NativeValue::Pointer(name.address())])?;
    if domain == NativeValue::Pointer(common::Address::NULL) {
        bail!("mono_jit_init returned no domain");
    }
    info!("Created root domain {:?}", domain_name);
    Ok(())
}

fn run_script(session: &Session, path: &Path) -> Result<()> {
    let source = std::fs::read_to_string(path).with_context(|| format!("Failed to read script {:?}", path))?;
    let lua = mlua::Lua::new();
    luabind::register(&lua, session.clone()).map_err(|e| anyhow::anyhow!("Failed to register bindings: {}", e))?;
    lua.load(source)
        .set_name(path.display().to_string())
        .exec()
        .map_err(|e| anyhow::anyhow!("Script {:?} failed: {}", path, e))
}

fn main() -> Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        unsafe {
            std::env::set_var("RUST_LOG", "info");
        }
    }
    env_logger::init();

    info!("Starting...");
    debug!("Debug logging is active");
    trace!("Trace logging is active");

    let args = parse_args()?;
    let config: HostConfig = common::config::load_or_create(&args.config)?;

    let runtime = NativeRuntime::load(&config.library_path)?;
    let missing = runtime.missing_symbols(common::natives::ALL);
    if !missing.is_empty() {
        warn!("Runtime does not export: {}", missing.join(", "));
    }

    let session = Session::attach(Arc::new(runtime), config.session.clone());
    if config.init_jit {
        init_domain(&session, &config.domain_name)?;
    }

    let image = match &config.image {
        Some(name) => MonoImage::loaded(&session, name)?
            .with_context(|| format!("Image {:?} is not loaded", name))?,
        None => MonoImage::corlib(&session)?.context("No corlib loaded")?,
    };
    dump::dump_image(&image)?;

    let classes = if args.classes.is_empty() {
        &config.classes
    } else {
        &args.classes
    };
    for full_name in classes {
        let (namespace, name) = split_class_name(full_name);
        match MonoClass::from_name(&image, namespace, name)? {
            Some(class) => dump::dump_class(&class)?,
            None => warn!("Class {} not found in {}", full_name, image.name()?),
        }
    }

    if let Some(script) = &args.script {
        run_script(&session, script)?;
    }

    session.detach();
    info!("Done");
    Ok(())
}
