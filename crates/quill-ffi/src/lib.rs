//! C exports for embedding the Quill editor bridge.
//!
//! The host links this crate as a static library and drives editors through
//! the functions in [`ffi`]. The editing engine is supplied from Rust: the
//! embedding registers a factory with [`register_engine`] before the host
//! creates its first editor.

pub mod ffi;

use std::path::Path;

use anyhow::{Context, Result};
use log::LevelFilter;
use once_cell::sync::{Lazy, OnceCell};
use parking_lot::RwLock;
use quill_bridge::logging::{self, PanicFn, WriteLogFn};
use quill_bridge::{BridgeError, EditorEngine, EditorInstance};
use quill_config::QuillConfig;

/// Builds one engine per created editor.
pub type EngineFactory = Box<dyn Fn() -> Box<dyn EditorEngine> + Send + Sync>;

static ENGINE_FACTORY: Lazy<RwLock<Option<EngineFactory>>> = Lazy::new(|| RwLock::new(None));
static CONFIG: Lazy<RwLock<QuillConfig>> = Lazy::new(|| RwLock::new(QuillConfig::default()));

/// Editor handle passed across the C boundary.
pub struct QuillEditor {
    instance: EditorInstance<'static>,
}

impl QuillEditor {
    pub fn instance(&mut self) -> &mut EditorInstance<'static> {
        &mut self.instance
    }
}

/// Install the engine used by every subsequent `quill_create`.
pub fn register_engine<F>(factory: F)
where
    F: Fn() -> Box<dyn EditorEngine> + Send + Sync + 'static,
{
    log::debug!("register_engine");
    *ENGINE_FACTORY.write() = Some(Box::new(factory));
}

pub fn clear_engine() {
    *ENGINE_FACTORY.write() = None;
}

pub fn create_engine() -> quill_bridge::Result<Box<dyn EditorEngine>> {
    let factory = ENGINE_FACTORY.read();
    let factory = factory.as_ref().ok_or(BridgeError::NoEngine)?;
    Ok(factory())
}

/// Configuration applied to editors created from now on.
pub fn config() -> QuillConfig {
    CONFIG.read().clone()
}

pub fn set_config(config: QuillConfig) {
    *CONFIG.write() = config;
}

/// Load configuration from `path`, or from `quill.toml` in the working
/// directory when `None`, then apply `QUILL_*` environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<QuillConfig> {
    let config = match path {
        Some(path) => {
            let mut config = QuillConfig::load_from_file(path)
                .with_context(|| format!("Failed to load config: {:?}", path))?;
            config.merge_with_env();
            config
        }
        None => QuillConfig::load(),
    };
    Ok(config)
}

/// Route logging to the host's `writeLog` when given, otherwise to
/// `env_logger`. Both honour `level`. Repeated calls keep the first logger.
pub fn init_logging(write_log: Option<WriteLogFn>, level: Option<&str>) {
    let level = logging::parse_level(level);
    let installed = match write_log {
        Some(write) => logging::install_host_logger(write, level).is_ok(),
        None => stderr_logger(level).try_init().is_ok(),
    };
    if !installed {
        log::debug!("logger already installed");
    }
}

fn stderr_logger(level: LevelFilter) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    builder
}

static PANIC_FORWARDER: OnceCell<()> = OnceCell::new();

/// Forward panic messages to the host. Only the first call installs a
/// forwarder; returns whether this call did.
pub fn init_panic_forwarding(panic_fn: Option<PanicFn>) -> bool {
    let Some(panic_fn) = panic_fn else {
        return false;
    };
    let mut installed = false;
    PANIC_FORWARDER.get_or_init(|| {
        logging::install_panic_forwarder(panic_fn);
        installed = true;
    });
    if !installed {
        log::debug!("panic forwarder already installed");
    }
    installed
}
