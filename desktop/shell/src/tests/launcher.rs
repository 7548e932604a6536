use crate::server::{Launcher, Runtime, ServerError, SlidevLauncher};

use std::ffi::OsString;
use std::path::Path;

use studio_config::SupervisorConfig;
use tempfile::TempDir;

fn touch(path: &Path) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, "").unwrap();
}

fn os(values: &[&str]) -> Vec<OsString> {
    values.iter().map(OsString::from).collect()
}

#[test]
fn given_no_resources_dir_when_command_then_development_fallback() {
    // Given
    let app = TempDir::new().unwrap();
    let config = SupervisorConfig::default();
    let launcher = SlidevLauncher::new(app.path(), config.clone());

    // When
    let command = launcher.command(Path::new("/decks"), "a.md", 4123).unwrap();

    // Then
    assert_eq!(command.program, Path::new(&config.dev_command));
    let mut expected: Vec<&str> = config.dev_args.iter().map(String::as_str).collect();
    expected.extend(["a.md", "--port", "4123"]);
    assert_eq!(command.args, os(&expected));
    assert_eq!(command.current_dir, Path::new("/decks"));
}

#[test]
fn given_complete_bundle_when_command_then_bundled_node_runs_cli() {
    // Given
    let app = TempDir::new().unwrap();
    let config = SupervisorConfig::default();
    let resources = app.path().join(&config.resources_dir);
    let node = resources.join(&config.bundled_node);
    let cli = resources.join(&config.bundled_cli);
    touch(&node);
    touch(&cli);
    let launcher = SlidevLauncher::new(app.path(), config);

    // When
    let command = launcher.command(Path::new("/decks"), "talk.md", 5000).unwrap();

    // Then
    assert_eq!(command.program, node);
    let mut expected = vec![cli.clone().into_os_string()];
    expected.extend(os(&["talk.md", "--port", "5000"]));
    assert_eq!(command.args, expected);
    assert_eq!(
        launcher.runtime().unwrap(),
        Runtime::Bundled { node, cli }
    );
}

#[test]
fn given_bundle_without_cli_when_command_then_bundle_incomplete() {
    let app = TempDir::new().unwrap();
    let config = SupervisorConfig::default();
    let resources = app.path().join(&config.resources_dir);
    touch(&resources.join(&config.bundled_node));
    let launcher = SlidevLauncher::new(app.path(), config);

    let result = launcher.command(Path::new("/decks"), "a.md", 4123);

    assert!(matches!(
        result,
        Err(ServerError::BundleIncomplete { ref path, .. }) if path.ends_with("slidev.mjs")
    ));
}

#[test]
fn given_empty_resources_dir_when_command_then_no_silent_fallback() {
    let app = TempDir::new().unwrap();
    let config = SupervisorConfig::default();
    std::fs::create_dir_all(app.path().join(&config.resources_dir)).unwrap();
    let launcher = SlidevLauncher::new(app.path(), config);

    let result = launcher.command(Path::new("/decks"), "a.md", 4123);

    assert!(matches!(result, Err(ServerError::BundleIncomplete { .. })));
}

#[test]
fn given_command_when_displayed_then_program_and_args_joined() {
    let app = TempDir::new().unwrap();
    let mut config = SupervisorConfig::default();
    config.dev_command = "npx".into();
    config.dev_args = vec!["--yes".into(), "@slidev/cli".into()];
    let launcher = SlidevLauncher::new(app.path(), config);

    let command = launcher.command(Path::new("."), "a.md", 3030).unwrap();

    assert_eq!(
        command.to_string(),
        "npx --yes @slidev/cli a.md --port 3030"
    );
}
