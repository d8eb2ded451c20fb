//! Plugin registry for managing plugins.
//!
//! Holds plugins in registration order and dispatches hooks to them.
//! Export and import are chain-of-responsibility: the first plugin that
//! returns `Some` wins. Lifecycle and render failures, including panics,
//! are contained per plugin.

use crate::core::{now, Error, HookOptions, PasswordRecord, Result, Timestamp};
use crate::plugin::interface::{Plugin, PluginHook, PluginInfo, PluginResult};
use crate::ui::SettingsContainer;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, error, info, warn};

/// Plugin status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PluginStatus {
    /// Registered and loaded cleanly
    Active,
    /// Registered, but `on_load` failed
    Error(String),
}

/// Registered plugin entry.
pub struct RegisteredPlugin {
    /// Plugin instance
    pub plugin: Box<dyn Plugin>,
    /// Plugin info
    pub info: PluginInfo,
    /// Declared hooks, captured at registration
    pub hooks: Vec<PluginHook>,
    /// Current status
    pub status: PluginStatus,
    /// Registration time
    pub registered_at: Timestamp,
}

impl RegisteredPlugin {
    fn implements(&self, hook: &PluginHook) -> bool {
        self.hooks.contains(hook)
    }
}

/// Plugin registry.
///
/// Created explicitly by the host; [`shutdown`](Self::shutdown) is the
/// matching teardown. Independent registries do not share state.
#[derive(Default)]
pub struct PluginRegistry {
    /// Registered plugins, in registration order
    plugins: Vec<RegisteredPlugin>,
}

impl PluginRegistry {
    /// Create a new registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin and run its `on_load` hook.
    ///
    /// A failing or panicking `on_load` is logged and recorded in the
    /// plugin's status; registration still succeeds.
    pub fn register(&mut self, mut plugin: Box<dyn Plugin>) -> Result<()> {
        let info = plugin.info();
        let name = info.name.trim().to_string();

        if name.is_empty() {
            return Err(Error::InvalidPlugin("plugin name is missing".to_string()));
        }

        if self.position(&name).is_some() {
            return Err(Error::InvalidPlugin(format!(
                "plugin {} is already registered",
                name
            )));
        }

        let hooks = plugin.hooks();
        if let Some(hook) = hooks.iter().find(|h| !h.is_dispatchable()) {
            return Err(Error::InvalidPlugin(format!(
                "plugin {} declares hook {} which is not callable",
                name, hook
            )));
        }

        let status = match guarded(&name, "onLoad", || plugin.on_load()) {
            Ok(()) => PluginStatus::Active,
            Err(reason) => {
                error!(plugin = %name, error = %reason, "Plugin failed to load");
                PluginStatus::Error(reason)
            }
        };

        info!(
            plugin = %name,
            version = %info.version,
            hooks = hooks.len(),
            "Plugin registered"
        );

        self.plugins.push(RegisteredPlugin {
            plugin,
            info: PluginInfo { name, ..info },
            hooks,
            status,
            registered_at: now(),
        });

        Ok(())
    }

    /// Unregister a plugin, running its `on_unload` hook.
    ///
    /// Errors raised by `on_unload` are logged and swallowed.
    pub fn unregister(&mut self, name: &str) -> Result<()> {
        let index = self
            .position(name)
            .ok_or_else(|| Error::PluginNotFound(name.to_string()))?;
        let mut entry = self.plugins.remove(index);

        if let Err(reason) = guarded(name, "onUnload", || entry.plugin.on_unload()) {
            warn!(plugin = %name, error = %reason, "Plugin failed to unload cleanly");
        }

        info!(plugin = %name, "Plugin unregistered");
        Ok(())
    }

    /// Unregister every plugin, most recently registered first.
    pub fn shutdown(&mut self) {
        while let Some(entry) = self.plugins.last() {
            let name = entry.info.name.clone();
            if let Err(e) = self.unregister(&name) {
                // Unreachable while `name` comes from the list itself.
                error!(plugin = %name, error = %e, "Shutdown could not unregister plugin");
                self.plugins.pop();
            }
        }
    }

    /// Export through the first plugin that claims `options.format`.
    pub fn dispatch_export(
        &self,
        records: &[PasswordRecord],
        options: &HookOptions,
    ) -> Result<String> {
        for entry in self.with_hook(&PluginHook::Export) {
            let name = &entry.info.name;
            let claimed = catch_unwind(AssertUnwindSafe(|| entry.plugin.on_export(records, options)))
                .unwrap_or_else(|_| {
                    error!(plugin = %name, hook = "onExport", "Plugin panicked");
                    None
                });

            if let Some(text) = claimed {
                debug!(plugin = %name, format = %options.format, records = records.len(), "Export handled");
                return Ok(text);
            }
        }

        warn!(format = %options.format, "No plugin handled export");
        Err(Error::UnsupportedFormat(options.format.clone()))
    }

    /// Import through the first plugin that claims `options.format`.
    pub fn dispatch_import(&self, text: &str, options: &HookOptions) -> Result<Vec<PasswordRecord>> {
        for entry in self.with_hook(&PluginHook::Import) {
            let name = &entry.info.name;
            let claimed = catch_unwind(AssertUnwindSafe(|| entry.plugin.on_import(text, options)))
                .unwrap_or_else(|_| {
                    error!(plugin = %name, hook = "onImport", "Plugin panicked");
                    None
                });

            if let Some(records) = claimed {
                debug!(plugin = %name, format = %options.format, records = records.len(), "Import handled");
                return Ok(records);
            }
        }

        warn!(format = %options.format, "No plugin handled import");
        Err(Error::UnsupportedFormat(options.format.clone()))
    }

    /// Let every plugin with a settings hook render into `container`.
    ///
    /// Returns how many plugins rendered without failing.
    pub fn dispatch_ui_render(&self, container: &mut SettingsContainer) -> usize {
        let mut rendered = 0;

        for entry in self.with_hook(&PluginHook::UiRender) {
            let name = &entry.info.name;
            match guarded(name, "onUIRender", || entry.plugin.on_ui_render(container)) {
                Ok(()) => rendered += 1,
                Err(reason) => {
                    error!(plugin = %name, error = %reason, "Plugin settings failed to render");
                }
            }
        }

        rendered
    }

    /// Get plugin by name.
    pub fn get_plugin(&self, name: &str) -> Option<&RegisteredPlugin> {
        self.plugins.iter().find(|p| p.info.name == name)
    }

    /// Get plugin status.
    pub fn get_status(&self, name: &str) -> Option<&PluginStatus> {
        self.get_plugin(name).map(|p| &p.status)
    }

    /// List all plugins in registration order.
    pub fn list_plugins(&self) -> Vec<&PluginInfo> {
        self.plugins.iter().map(|p| &p.info).collect()
    }

    /// Get plugin count.
    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.plugins.iter().position(|p| p.info.name == name)
    }

    fn with_hook<'a>(
        &'a self,
        hook: &'a PluginHook,
    ) -> impl Iterator<Item = &'a RegisteredPlugin> + 'a {
        self.plugins.iter().filter(move |p| p.implements(hook))
    }
}

/// Run a fallible plugin callback, converting errors and panics into a
/// reason string.
fn guarded<F>(plugin: &str, hook: &str, work: F) -> std::result::Result<(), String>
where
    F: FnOnce() -> PluginResult<()>,
{
    match catch_unwind(AssertUnwindSafe(work)) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(e.message),
        Err(_) => Err(format!("{} panicked in {}", plugin, hook)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::interface::testing::{Calls, MockPlugin};
    use crate::ui::sanitize::testing::RecordingSanitizer;
    use std::sync::Arc;

    fn container() -> SettingsContainer {
        SettingsContainer::new(Arc::new(RecordingSanitizer::default()))
    }

    #[test]
    fn test_registry_creation() {
        let registry = PluginRegistry::new();
        assert_eq!(registry.plugin_count(), 0);
    }

    #[test]
    fn test_register_runs_on_load_once() {
        let mut registry = PluginRegistry::new();
        let plugin = MockPlugin::new("xml");
        let calls = plugin.calls.clone();

        registry.register(Box::new(plugin)).unwrap();

        assert_eq!(registry.plugin_count(), 1);
        assert_eq!(Calls::get(&calls.load), 1);
        assert_eq!(registry.get_status("xml"), Some(&PluginStatus::Active));
    }

    #[test]
    fn test_register_rejects_missing_name() {
        let mut registry = PluginRegistry::new();
        let result = registry.register(Box::new(MockPlugin::new("   ")));
        assert!(matches!(result, Err(Error::InvalidPlugin(_))));
        assert_eq!(registry.plugin_count(), 0);
    }

    #[test]
    fn test_duplicate_registration() {
        let mut registry = PluginRegistry::new();
        registry.register(Box::new(MockPlugin::new("xml"))).unwrap();

        let second = MockPlugin::new("xml");
        let calls = second.calls.clone();
        let result = registry.register(Box::new(second));

        assert!(matches!(result, Err(Error::InvalidPlugin(_))));
        assert_eq!(Calls::get(&calls.load), 0);
        assert_eq!(registry.plugin_count(), 1);
    }

    #[test]
    fn test_register_rejects_uncallable_hook() {
        let mut registry = PluginRegistry::new();
        let mut plugin = MockPlugin::new("printer");
        plugin.hooks.push(PluginHook::Custom("onPrint".into()));

        let result = registry.register(Box::new(plugin));
        assert!(matches!(result, Err(Error::InvalidPlugin(msg)) if msg.contains("onPrint")));
    }

    #[test]
    fn test_failed_load_still_registers() {
        let mut registry = PluginRegistry::new();
        let mut plugin = MockPlugin::new("flaky").claiming("xml");
        plugin.fail_load = true;

        registry.register(Box::new(plugin)).unwrap();

        assert_eq!(
            registry.get_status("flaky"),
            Some(&PluginStatus::Error("load failed".to_string()))
        );
        let out = registry
            .dispatch_export(&[], &HookOptions::new("xml"))
            .unwrap();
        assert_eq!(out, "flaky");
    }

    #[test]
    fn test_panicking_load_is_contained() {
        let mut registry = PluginRegistry::new();
        let mut plugin = MockPlugin::new("crashy");
        plugin.panic_load = true;

        registry.register(Box::new(plugin)).unwrap();

        assert!(matches!(registry.get_status("crashy"), Some(PluginStatus::Error(_))));
    }

    #[test]
    fn test_unregister_swallows_unload_error() {
        let mut registry = PluginRegistry::new();
        let mut plugin = MockPlugin::new("xml");
        plugin.fail_unload = true;
        let calls = plugin.calls.clone();
        registry.register(Box::new(plugin)).unwrap();

        registry.unregister("xml").unwrap();

        assert_eq!(Calls::get(&calls.unload), 1);
        assert_eq!(registry.plugin_count(), 0);
    }

    #[test]
    fn test_unregister_unknown() {
        let mut registry = PluginRegistry::new();
        assert!(matches!(
            registry.unregister("ghost"),
            Err(Error::PluginNotFound(_))
        ));
    }

    #[test]
    fn test_dispatch_short_circuits() {
        let mut registry = PluginRegistry::new();
        let first = MockPlugin::new("csv").claiming("csv");
        let second = MockPlugin::new("xml-a").claiming("xml");
        let third = MockPlugin::new("xml-b").claiming("xml");
        let first_calls = first.calls.clone();
        let third_calls = third.calls.clone();
        registry.register(Box::new(first)).unwrap();
        registry.register(Box::new(second)).unwrap();
        registry.register(Box::new(third)).unwrap();

        let out = registry
            .dispatch_export(&[], &HookOptions::new("xml"))
            .unwrap();

        assert_eq!(out, "xml-a");
        assert_eq!(Calls::get(&first_calls.export), 1);
        assert_eq!(Calls::get(&third_calls.export), 0);
    }

    #[test]
    fn test_dispatch_import_short_circuits() {
        let mut registry = PluginRegistry::new();
        registry
            .register(Box::new(MockPlugin::new("a").claiming("xml")))
            .unwrap();
        registry
            .register(Box::new(MockPlugin::new("b").claiming("xml")))
            .unwrap();

        let records = registry
            .dispatch_import("data", &HookOptions::new("xml"))
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].password, "a:data");
    }

    #[test]
    fn test_dispatch_unsupported_format() {
        let mut registry = PluginRegistry::new();
        registry
            .register(Box::new(MockPlugin::new("xml").claiming("xml")))
            .unwrap();

        let result = registry.dispatch_export(&[], &HookOptions::new("yaml"));
        assert!(matches!(result, Err(Error::UnsupportedFormat(f)) if f == "yaml"));

        let result = registry.dispatch_import("", &HookOptions::new("yaml"));
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn test_dispatch_skips_undeclared_hooks() {
        let mut registry = PluginRegistry::new();
        let mut plugin = MockPlugin::new("import-only").claiming("xml");
        plugin.hooks = vec![PluginHook::Import];
        let calls = plugin.calls.clone();
        registry.register(Box::new(plugin)).unwrap();

        assert!(registry
            .dispatch_export(&[], &HookOptions::new("xml"))
            .is_err());
        assert_eq!(Calls::get(&calls.export), 0);
    }

    #[test]
    fn test_ui_render_isolates_failures() {
        let mut registry = PluginRegistry::new();
        let mut broken = MockPlugin::new("broken");
        broken.fail_render = true;
        let mut crashing = MockPlugin::new("crashing");
        crashing.panic_render = true;
        registry.register(Box::new(broken)).unwrap();
        registry.register(Box::new(crashing)).unwrap();
        registry.register(Box::new(MockPlugin::new("healthy"))).unwrap();

        let mut container = container();
        let rendered = registry.dispatch_ui_render(&mut container);

        assert_eq!(rendered, 1);
        assert_eq!(container.sections().len(), 1);
        assert_eq!(container.sections()[0].plugin, "healthy");
    }

    #[test]
    fn test_ui_render_reaches_every_plugin() {
        let mut registry = PluginRegistry::new();
        registry.register(Box::new(MockPlugin::new("a"))).unwrap();
        registry.register(Box::new(MockPlugin::new("b"))).unwrap();

        let mut container = container();
        assert_eq!(registry.dispatch_ui_render(&mut container), 2);
    }

    #[test]
    fn test_shutdown_unloads_in_reverse_order() {
        let mut registry = PluginRegistry::new();
        let a = MockPlugin::new("a");
        let b = MockPlugin::new("b");
        let (a_calls, b_calls) = (a.calls.clone(), b.calls.clone());
        registry.register(Box::new(a)).unwrap();
        registry.register(Box::new(b)).unwrap();

        registry.shutdown();

        assert_eq!(registry.plugin_count(), 0);
        assert_eq!(Calls::get(&a_calls.unload), 1);
        assert_eq!(Calls::get(&b_calls.unload), 1);
    }

    #[test]
    fn test_list_plugins_in_registration_order() {
        let mut registry = PluginRegistry::new();
        for name in ["zeta", "alpha", "mid"] {
            registry.register(Box::new(MockPlugin::new(name))).unwrap();
        }

        let names: Vec<_> = registry.list_plugins().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }
}
