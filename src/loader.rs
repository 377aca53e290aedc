//! Component loader.
//!
//! The engine never scans the file system. This module does, on its behalf: it walks a directory,
//! keeps the files whose name matches a glob pattern, and resolves each one against a
//! [`ModuleCatalog`], the registration table of modules this binary can "load". On top of that it
//! finds plugin types: concrete [`ComponentType`]s that provide a requested capability, exposed as
//! [`PluginInfo`] `(name, description, factory)` triples.
//!
//! ## Notes
//! - A missing directory is not an error; discovery returns `Ok(None)`.
//! - A matching file that is not in the catalog is an error, like a corrupt library would be.
//! - Results follow the directory walk, with entries of each directory sorted by file name.
//! - Symbolic links are followed, so a linked module file is found like a regular one.

use std::any::{Any, TypeId};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use miette::Diagnostic;
use thiserror::Error;
use walkdir::WalkDir;

use crate::suite::Module;

/// Default file-name pattern for plugin modules.
pub const DEFAULT_PLUGIN_PATTERN: &str = "*.plugin";

/// Default file-name pattern for suite modules.
pub const DEFAULT_SUITE_PATTERN: &str = "*.suite";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchOption {
    /// Only the given directory.
    TopDirectoryOnly,
    /// The given directory and every directory below it.
    #[default]
    AllDirectories,
}

#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    #[error("invalid file-name pattern `{pattern}`")]
    #[diagnostic(code(trellis::loader::pattern))]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("`{}` is not a loadable module", .path.display())]
    #[diagnostic(
        code(trellis::loader::not_loadable),
        help("register the file name in the module catalog or narrow the pattern")
    )]
    NotLoadable { path: PathBuf },
}

// ============================================================================
// Module catalog
// ============================================================================

/// Registration table of loadable modules, keyed by file name.
pub struct ModuleCatalog<M> {
    modules: BTreeMap<String, M>,
}

/// A module file found during discovery.
#[derive(Debug)]
pub struct Discovered<'c, M> {
    pub path: PathBuf,
    pub module: &'c M,
}

impl<M> Default for ModuleCatalog<M> {
    fn default() -> Self {
        Self {
            modules: BTreeMap::new(),
        }
    }
}

impl<M> ModuleCatalog<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `module` under `file_name`, returning any module it replaces.
    pub fn register(&mut self, file_name: impl Into<String>, module: M) -> Option<M> {
        self.modules.insert(file_name.into(), module)
    }

    pub fn with(mut self, file_name: impl Into<String>, module: M) -> Self {
        self.register(file_name, module);
        self
    }

    pub fn get(&self, file_name: &str) -> Option<&M> {
        self.modules.get(file_name)
    }

    pub fn modules(&self) -> impl Iterator<Item = (&str, &M)> {
        self.modules.iter().map(|(name, module)| (name.as_str(), module))
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Find the module files under `dir` whose name matches `pattern`.
    ///
    /// ## Returns
    /// - `Ok(None)` if `dir` is not an existing directory.
    /// - `Ok(Some(found))` otherwise, possibly empty.
    ///
    /// ## Errors
    /// - [`LoadError::Pattern`] for a malformed glob.
    /// - [`LoadError::NotLoadable`] for a matching file absent from the catalog.
    pub fn discover(
        &self,
        dir: &Path,
        pattern: &str,
        option: SearchOption,
    ) -> Result<Option<Vec<Discovered<'_, M>>>, LoadError> {
        if !dir.is_dir() {
            tracing::debug!(dir = %dir.display(), "module directory does not exist");
            return Ok(None);
        }

        let matcher = glob::Pattern::new(pattern).map_err(|source| LoadError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;
        let max_depth = match option {
            SearchOption::TopDirectoryOnly => 1,
            SearchOption::AllDirectories => usize::MAX,
        };

        let entries = WalkDir::new(dir)
            .follow_links(true)
            .min_depth(1)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::debug!("skipping unreadable entry: {}", e);
                    None
                }
            });

        let mut found = Vec::new();
        for entry in entries {
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            if !matcher.matches(name) {
                continue;
            }
            let module = self.modules.get(name).ok_or_else(|| LoadError::NotLoadable {
                path: entry.path().to_path_buf(),
            })?;
            found.push(Discovered {
                path: entry.into_path(),
                module,
            });
        }

        tracing::debug!(dir = %dir.display(), pattern, count = found.len(), "discovered modules");
        Ok(Some(found))
    }
}

impl<M> fmt::Debug for ModuleCatalog<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.modules.keys()).finish()
    }
}

/// Discover suite modules for [`crate::TestRunner::run_module`].
pub fn discover_suites<'c>(
    catalog: &'c ModuleCatalog<Module>,
    dir: &Path,
    pattern: &str,
    option: SearchOption,
) -> Result<Option<Vec<&'c Module>>, LoadError> {
    Ok(catalog
        .discover(dir, pattern, option)?
        .map(|found| found.into_iter().map(|d| d.module).collect()))
}

// ============================================================================
// Plugin components
// ============================================================================

/// Shared factory producing capability `T`.
pub type Factory<T> = Rc<dyn Fn() -> Box<T>>;

/// Display metadata attached to a plugin type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginAttribute {
    pub name: String,
    pub description: String,
}

struct Capability {
    id: TypeId,
    name: &'static str,
    factory: Box<dyn Any>,
}

/// A type registered in a component module, with the capabilities it provides.
pub struct ComponentType {
    name: &'static str,
    concrete: bool,
    attributes: Vec<PluginAttribute>,
    capabilities: Vec<Capability>,
}

impl ComponentType {
    /// A concrete, instantiable type.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            concrete: true,
            attributes: Vec::new(),
            capabilities: Vec::new(),
        }
    }

    /// A type that cannot be instantiated. The loader never returns it.
    pub fn abstract_type(name: &'static str) -> Self {
        Self {
            concrete: false,
            ..Self::new(name)
        }
    }

    /// Attach plugin metadata. Repeatable; the first attribute is the one reported.
    pub fn plugin(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.attributes.push(PluginAttribute {
            name: name.into(),
            description: description.into(),
        });
        self
    }

    /// Declare that this type provides capability `T`, built by `factory`.
    pub fn provides<T: ?Sized + 'static>(mut self, factory: impl Fn() -> Box<T> + 'static) -> Self {
        let factory: Factory<T> = Rc::new(factory);
        self.capabilities.push(Capability {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            factory: Box::new(factory),
        });
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_concrete(&self) -> bool {
        self.concrete
    }

    pub fn attribute(&self) -> Option<&PluginAttribute> {
        self.attributes.first()
    }

    pub fn implements<T: ?Sized + 'static>(&self) -> bool {
        self.capabilities.iter().any(|c| c.id == TypeId::of::<T>())
    }

    fn factory<T: ?Sized + 'static>(&self) -> Option<Factory<T>> {
        self.capabilities
            .iter()
            .find(|c| c.id == TypeId::of::<T>())
            .and_then(|c| c.factory.downcast_ref::<Factory<T>>())
            .cloned()
    }
}

impl fmt::Debug for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let capabilities: Vec<_> = self.capabilities.iter().map(|c| c.name).collect();
        f.debug_struct("ComponentType")
            .field("name", &self.name)
            .field("concrete", &self.concrete)
            .field("attributes", &self.attributes)
            .field("capabilities", &capabilities)
            .finish()
    }
}

/// A loadable module of component types.
#[derive(Debug)]
pub struct ComponentModule {
    name: String,
    types: Vec<ComponentType>,
}

impl ComponentModule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: Vec::new(),
        }
    }

    pub fn with_type(mut self, ty: ComponentType) -> Self {
        self.types.push(ty);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn types(&self) -> &[ComponentType] {
        &self.types
    }
}

/// A discovered plugin providing capability `T`.
pub struct PluginInfo<T: ?Sized> {
    module: PathBuf,
    type_name: &'static str,
    name: String,
    description: Option<String>,
    factory: Factory<T>,
}

impl<T: ?Sized> PluginInfo<T> {
    fn new(module: &Path, ty: &ComponentType, factory: Factory<T>) -> Self {
        let attribute = ty.attribute();
        Self {
            module: module.to_path_buf(),
            type_name: ty.name(),
            name: attribute.map_or_else(|| ty.name().to_string(), |a| a.name.clone()),
            description: attribute.map(|a| a.description.clone()),
            factory,
        }
    }

    /// Path of the module file the plugin was found in.
    pub fn module(&self) -> &Path {
        &self.module
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Attribute name, or the type name when the type carries no attribute.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Build a fresh instance.
    pub fn create_instance(&self) -> Box<T> {
        (self.factory)()
    }
}

impl<T: ?Sized> fmt::Debug for PluginInfo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginInfo")
            .field("module", &self.module)
            .field("type_name", &self.type_name)
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Load every concrete type providing capability `T` from the modules under `path`.
///
/// ## Returns
/// - `Ok(None)` if `path` is not an existing directory.
pub fn load_plugins<T: ?Sized + 'static>(
    catalog: &ModuleCatalog<ComponentModule>,
    path: &Path,
    pattern: &str,
    option: SearchOption,
) -> Result<Option<Vec<PluginInfo<T>>>, LoadError> {
    let Some(found) = catalog.discover(path, pattern, option)? else {
        return Ok(None);
    };

    let mut plugins = Vec::new();
    for Discovered { path, module } in found {
        for ty in module.types().iter().filter(|ty| ty.is_concrete()) {
            if let Some(factory) = ty.factory::<T>() {
                plugins.push(PluginInfo::new(&path, ty, factory));
            }
        }
    }
    Ok(Some(plugins))
}

/// [`load_plugins`] with [`DEFAULT_PLUGIN_PATTERN`] over all directories.
pub fn load_plugins_in<T: ?Sized + 'static>(
    catalog: &ModuleCatalog<ComponentModule>,
    path: &Path,
) -> Result<Option<Vec<PluginInfo<T>>>, LoadError> {
    load_plugins(catalog, path, DEFAULT_PLUGIN_PATTERN, SearchOption::AllDirectories)
}
