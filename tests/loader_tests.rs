//! Directory discovery and plugin loading against real directory trees.

use std::fs;
use std::path::Path;

use tempfile::TempDir;
use trellis::loader::{
    ComponentModule, ComponentType, LoadError, ModuleCatalog, SearchOption, discover_suites, load_plugins,
    load_plugins_in,
};
use trellis::{Method, Module, SuiteType, TestRunner};

trait Greeter {
    fn greet(&self) -> String;
}

struct English;

impl Greeter for English {
    fn greet(&self) -> String {
        "hello".to_string()
    }
}

struct French;

impl Greeter for French {
    fn greet(&self) -> String {
        "bonjour".to_string()
    }
}

fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"").unwrap();
}

fn suite_module(name: &'static str) -> Module {
    Module::new(name).with_type(
        SuiteType::builder::<()>(name)
            .suite()
            .constructor(|| Ok(()))
            .method(Method::new("t", |_: &mut ()| Ok(())).test())
            .build(),
    )
}

#[test]
fn test_missing_directory_yields_none() {
    let dir = TempDir::new().unwrap();
    let catalog = ModuleCatalog::<Module>::new();
    let found = catalog
        .discover(&dir.path().join("absent"), "*.suite", SearchOption::AllDirectories)
        .unwrap();
    assert!(found.is_none());
}

#[test]
fn test_discovery_respects_pattern_and_depth() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "b.suite");
    touch(dir.path(), "a.suite");
    touch(dir.path(), "notes.txt");
    touch(dir.path(), "nested/c.suite");

    let catalog = ModuleCatalog::new()
        .with("a.suite", suite_module("a"))
        .with("b.suite", suite_module("b"))
        .with("c.suite", suite_module("c"));

    let top = discover_suites(&catalog, dir.path(), "*.suite", SearchOption::TopDirectoryOnly)
        .unwrap()
        .unwrap();
    let names: Vec<_> = top.iter().map(|m| m.name()).collect();
    assert_eq!(names, ["a", "b"]);

    let all = discover_suites(&catalog, dir.path(), "*.suite", SearchOption::AllDirectories)
        .unwrap()
        .unwrap();
    let names: Vec<_> = all.iter().map(|m| m.name()).collect();
    assert_eq!(names, ["a", "b", "c"]);
}

#[test]
fn test_discovered_modules_feed_the_runner() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "only.suite");
    let catalog = ModuleCatalog::new().with("only.suite", suite_module("only"));

    let modules = discover_suites(&catalog, dir.path(), "*.suite", SearchOption::default())
        .unwrap()
        .unwrap();
    let mut runner = TestRunner::new(Vec::<String>::new());
    for module in modules {
        runner.run_module(Some(module)).unwrap();
    }
    assert_eq!(runner.into_sink(), ["Class [only]", "  Test [fn t(&mut self)]"]);
}

#[cfg(unix)]
#[test]
fn test_symlinked_module_files_are_discovered() {
    let store = TempDir::new().unwrap();
    touch(store.path(), "linked.suite");
    let dir = TempDir::new().unwrap();
    std::os::unix::fs::symlink(store.path().join("linked.suite"), dir.path().join("linked.suite")).unwrap();

    let catalog = ModuleCatalog::new().with("linked.suite", suite_module("linked"));
    let found = discover_suites(&catalog, dir.path(), "*.suite", SearchOption::AllDirectories)
        .unwrap()
        .unwrap();
    let names: Vec<_> = found.iter().map(|m| m.name()).collect();
    assert_eq!(names, ["linked"]);
}

#[test]
fn test_unregistered_matching_file_is_not_loadable() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "stray.suite");
    let catalog = ModuleCatalog::<Module>::new();

    let err = catalog
        .discover(dir.path(), "*.suite", SearchOption::AllDirectories)
        .unwrap_err();
    match err {
        LoadError::NotLoadable { path } => assert!(path.ends_with("stray.suite")),
        other => panic!("expected NotLoadable, got {other:?}"),
    }
}

#[test]
fn test_invalid_pattern_is_reported() {
    let dir = TempDir::new().unwrap();
    let catalog = ModuleCatalog::<Module>::new();
    let err = catalog.discover(dir.path(), "[", SearchOption::AllDirectories).unwrap_err();
    assert!(matches!(err, LoadError::Pattern { .. }));
}

#[test]
fn test_load_plugins_finds_concrete_providers() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "greeters.plugin");
    touch(dir.path(), "nested/more.plugin");

    let greeters = ComponentModule::new("greeters")
        .with_type(ComponentType::abstract_type("GreeterBase"))
        .with_type(
            ComponentType::new("English")
                .plugin("english", "Greets in English")
                .provides::<dyn Greeter>(|| Box::new(English)),
        )
        .with_type(ComponentType::new("Unrelated"));
    let more = ComponentModule::new("more")
        .with_type(ComponentType::new("French").provides::<dyn Greeter>(|| Box::new(French)));
    let catalog = ModuleCatalog::new()
        .with("greeters.plugin", greeters)
        .with("more.plugin", more);

    let plugins = load_plugins_in::<dyn Greeter>(&catalog, dir.path()).unwrap().unwrap();
    assert_eq!(plugins.len(), 2);

    let english = &plugins[0];
    assert_eq!(english.name(), "english");
    assert_eq!(english.description(), Some("Greets in English"));
    assert_eq!(english.type_name(), "English");
    assert!(english.module().ends_with("greeters.plugin"));
    assert_eq!(english.create_instance().greet(), "hello");

    let french = &plugins[1];
    assert_eq!(french.name(), "French");
    assert_eq!(french.description(), None);
    assert_eq!(french.create_instance().greet(), "bonjour");

    let shallow =
        load_plugins::<dyn Greeter>(&catalog, dir.path(), "*.plugin", SearchOption::TopDirectoryOnly)
            .unwrap()
            .unwrap();
    assert_eq!(shallow.len(), 1);
}
