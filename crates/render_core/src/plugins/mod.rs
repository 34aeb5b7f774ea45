//! Renderer registry
//!
//! Renderers are looked up by name. A name is derived from a plugin file the
//! way shared objects are usually named: `libogl33.so` and `ogl33.dll` both
//! become `ogl33`. The crate does not load shared objects itself; hosts
//! register a factory per name (for example after resolving a plugin's entry
//! points) and the registry creates each renderer on first use.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use thiserror::Error;

use crate::core::EngineConfig;
use crate::render::RenderError;
use crate::Renderer;

/// File extensions treated as plugin candidates
const PLUGIN_EXTENSIONS: [&str; 3] = ["so", "dylib", "dll"];

/// Registry errors
#[derive(Error, Debug)]
pub enum PluginError {
    /// No factory is registered under the name
    #[error("No renderer named '{0}'")]
    UnknownRenderer(String),

    /// The factory failed to build its renderer
    #[error("Renderer '{name}' failed to start: {source}")]
    Startup {
        /// Registered name
        name: String,
        /// Why the factory failed
        #[source]
        source: RenderError,
    },

    /// The plugin directory could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Builds a renderer for one registered name
pub type RendererFactory = Box<dyn Fn(&EngineConfig) -> Result<Renderer, RenderError>>;

/// Lookup name of a plugin file
///
/// Everything from the first `.` of the file name on is dropped, then a
/// leading `lib`. Returns `None` when nothing is left.
pub fn plugin_name(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let stem = file_name.split('.').next().unwrap_or(file_name);
    let name = stem.strip_prefix("lib").unwrap_or(stem);
    (!name.is_empty()).then(|| name.to_string())
}

/// A plugin file found by [`discover`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredPlugin {
    /// Lookup name
    pub name: String,
    /// Location on disk
    pub path: PathBuf,
}

/// List plugin candidates in `dir`, sorted by name
///
/// A missing directory is not an error; it simply holds no plugins.
pub fn discover(dir: impl AsRef<Path>) -> Result<Vec<DiscoveredPlugin>, PluginError> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        debug!("Plugin directory {} does not exist", dir.display());
        return Ok(Vec::new());
    }

    let mut plugins = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || !is_shared_object(&path) {
            continue;
        }
        match plugin_name(&path) {
            Some(name) => plugins.push(DiscoveredPlugin { name, path }),
            None => warn!("Ignoring plugin with no usable name: {}", path.display()),
        }
    }
    plugins.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));
    Ok(plugins)
}

fn is_shared_object(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.split('.').skip(1).any(|part| PLUGIN_EXTENSIONS.contains(&part)))
}

struct Entry {
    factory: RendererFactory,
    renderer: Option<Renderer>,
}

/// Named renderer factories with lazily created instances
pub struct RendererRegistry {
    config: EngineConfig,
    entries: BTreeMap<String, Entry>,
}

impl RendererRegistry {
    /// Create an empty registry handing `config` to every factory
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            entries: BTreeMap::new(),
        }
    }

    /// Register a factory, replacing any earlier one with the same name
    ///
    /// A renderer already created under that name is dropped.
    pub fn register(&mut self, name: impl Into<String>, factory: RendererFactory) {
        let name = name.into();
        debug!("Registered renderer '{}'", name);
        self.entries.insert(
            name,
            Entry {
                factory,
                renderer: None,
            },
        );
    }

    /// Whether a factory is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names in ascending order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Whether the renderer for `name` has been created
    pub fn is_running(&self, name: &str) -> bool {
        self.entries.get(name).is_some_and(|entry| entry.renderer.is_some())
    }

    /// The renderer registered as `name`, created on first request
    pub fn get_renderer(&mut self, name: &str) -> Result<&mut Renderer, PluginError> {
        let entry = self
            .entries
            .get_mut(name)
            .ok_or_else(|| PluginError::UnknownRenderer(name.to_string()))?;

        if entry.renderer.is_none() {
            let renderer = (entry.factory)(&self.config).map_err(|source| PluginError::Startup {
                name: name.to_string(),
                source,
            })?;
            info!("Started renderer '{}'", name);
            entry.renderer = Some(renderer);
        }

        entry
            .renderer
            .as_mut()
            .ok_or_else(|| PluginError::UnknownRenderer(name.to_string()))
    }

    /// Drop the renderer created for `name`, keeping its factory
    pub fn shutdown(&mut self, name: &str) -> bool {
        let stopped = self
            .entries
            .get_mut(name)
            .and_then(|entry| entry.renderer.take())
            .is_some();
        if stopped {
            info!("Stopped renderer '{}'", name);
        }
        stopped
    }
}

impl fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererRegistry")
            .field("names", &self.entries.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backends::headless::{CommandLog, HeadlessBackend, HeadlessWindowProvider};
    use std::cell::Cell;
    use std::rc::Rc;

    fn headless_factory(created: Rc<Cell<u32>>) -> RendererFactory {
        Box::new(move |config| {
            created.set(created.get() + 1);
            let log = CommandLog::new();
            Ok(Renderer::with_config(
                Box::new(HeadlessBackend::new(log.clone())),
                Box::new(HeadlessWindowProvider::new(log)),
                config.clone(),
            ))
        })
    }

    #[test]
    fn test_plugin_name_strips_prefix_and_extensions() {
        assert_eq!(plugin_name(Path::new("bin/plugins/libogl33.so")).as_deref(), Some("ogl33"));
        assert_eq!(plugin_name(Path::new("libogl33.so.1.2")).as_deref(), Some("ogl33"));
        assert_eq!(plugin_name(Path::new("vulkan.dll")).as_deref(), Some("vulkan"));
        assert_eq!(plugin_name(Path::new("library.so")).as_deref(), Some("rary"));
        assert_eq!(plugin_name(Path::new("lib.so")), None);
    }

    #[test]
    fn test_discover_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let plugins = discover(dir.path().join("nope")).unwrap();
        assert!(plugins.is_empty());
    }

    #[test]
    fn test_discover_lists_shared_objects_by_name() {
        let dir = tempfile::tempdir().unwrap();
        for file in ["libzeta.so", "alpha.dll", "README.md", "libbeta.so.1"] {
            std::fs::write(dir.path().join(file), b"").unwrap();
        }
        std::fs::create_dir(dir.path().join("libdir.so")).unwrap();

        let names: Vec<_> = discover(dir.path()).unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["alpha", "beta", "zeta"]);
    }

    #[test]
    fn test_renderer_is_created_once_and_cached() {
        let created = Rc::new(Cell::new(0));
        let mut registry = RendererRegistry::new(EngineConfig::default());
        registry.register("headless", headless_factory(created.clone()));

        assert!(!registry.is_running("headless"));
        registry.get_renderer("headless").unwrap().create_camera().unwrap();
        let camera = registry.get_renderer("headless").unwrap().create_camera().unwrap();

        assert_eq!(created.get(), 1);
        assert_eq!(camera, 2);
        assert!(registry.is_running("headless"));
    }

    #[test]
    fn test_unknown_renderer_is_an_error() {
        let mut registry = RendererRegistry::new(EngineConfig::default());
        assert!(matches!(
            registry.get_renderer("missing"),
            Err(PluginError::UnknownRenderer(name)) if name == "missing"
        ));
    }

    #[test]
    fn test_failing_factory_reports_startup_error() {
        let mut registry = RendererRegistry::new(EngineConfig::default());
        registry.register(
            "broken",
            Box::new(|_| Err(RenderError::BackendFailure("no device".to_string()))),
        );

        assert!(matches!(registry.get_renderer("broken"), Err(PluginError::Startup { .. })));
        assert!(!registry.is_running("broken"));
    }

    #[test]
    fn test_shutdown_keeps_factory() {
        let created = Rc::new(Cell::new(0));
        let mut registry = RendererRegistry::new(EngineConfig::default());
        registry.register("headless", headless_factory(created.clone()));

        registry.get_renderer("headless").unwrap();
        assert!(registry.shutdown("headless"));
        assert!(!registry.shutdown("headless"));

        registry.get_renderer("headless").unwrap();
        assert_eq!(created.get(), 2);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["headless"]);
    }
}
