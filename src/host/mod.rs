//! Host Module
//!
//! Wraps a registry for an async caller:
//! - Dispatch runs on the blocking pool so the caller stays responsive
//! - A second export (or import) while one is running is refused
//! - Default registry assembly from configuration

pub mod config;

pub use config::HostConfig;

use crate::codec::{JsonCodecPlugin, XmlCodecPlugin};
use crate::core::{Error, HookOptions, PasswordRecord, Result};
use crate::plugin::PluginRegistry;
use crate::ui::SettingsContainer;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

/// Build a registry with the bundled codecs: XML first, then JSON if enabled.
pub fn default_registry(config: &HostConfig) -> Result<PluginRegistry> {
    let mut registry = PluginRegistry::new();
    registry.register(Box::new(XmlCodecPlugin::with_settings(config.xml.clone())))?;
    if config.enable_json {
        registry.register(Box::new(JsonCodecPlugin::new()))?;
    }
    Ok(registry)
}

/// Async facade over a [`PluginRegistry`].
#[derive(Clone)]
pub struct PluginHost {
    registry: Arc<RwLock<PluginRegistry>>,
    exporting: Arc<AtomicBool>,
    importing: Arc<AtomicBool>,
}

impl PluginHost {
    /// Wrap an existing registry.
    pub fn new(registry: PluginRegistry) -> Self {
        Self {
            registry: Arc::new(RwLock::new(registry)),
            exporting: Arc::new(AtomicBool::new(false)),
            importing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Build a host with the default registry for `config`.
    pub fn from_config(config: &HostConfig) -> Result<Self> {
        let host = Self::new(default_registry(config)?);
        info!(plugins = host.registry.read().plugin_count(), "Plugin host ready");
        Ok(host)
    }

    /// Shared registry handle, for registering and unregistering plugins.
    pub fn registry(&self) -> Arc<RwLock<PluginRegistry>> {
        Arc::clone(&self.registry)
    }

    /// Export `records` in `options.format`.
    pub async fn export(&self, records: Vec<PasswordRecord>, options: HookOptions) -> Result<String> {
        let guard = InFlight::acquire(&self.exporting, "export")?;
        let registry = Arc::clone(&self.registry);

        // The guard moves into the task so a dropped caller keeps the slot
        // held until dispatch returns.
        tokio::task::spawn_blocking(move || {
            let _guard = guard;
            let registry = registry.read();
            registry.dispatch_export(&records, &options)
        })
        .await
        .map_err(|e| Error::Internal(format!("export task failed: {}", e)))?
    }

    /// Import `text` as `options.format`.
    pub async fn import(&self, text: String, options: HookOptions) -> Result<Vec<PasswordRecord>> {
        let guard = InFlight::acquire(&self.importing, "import")?;
        let registry = Arc::clone(&self.registry);

        tokio::task::spawn_blocking(move || {
            let _guard = guard;
            let registry = registry.read();
            registry.dispatch_import(&text, &options)
        })
        .await
        .map_err(|e| Error::Internal(format!("import task failed: {}", e)))?
    }

    /// Render every plugin's settings into `container`.
    pub fn render_settings(&self, container: &mut SettingsContainer) -> usize {
        self.registry.read().dispatch_ui_render(container)
    }

    /// Unregister every plugin.
    pub fn shutdown(&self) {
        self.registry.write().shutdown();
        info!("Plugin host shut down");
    }
}

/// Marks an operation as running until dropped.
struct InFlight {
    flag: Arc<AtomicBool>,
}

impl InFlight {
    fn acquire(flag: &Arc<AtomicBool>, operation: &str) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| Error::OperationInProgress(operation.to_string()))?;
        Ok(Self {
            flag: Arc::clone(flag),
        })
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
