use crate::tests::{EnvGuard, setup_config_dir};
use crate::{CONFIG_FILENAME, Config, ConfigError};

use googletest::assert_that;
use googletest::prelude::{anything, eq, err, ok};
use serial_test::serial;

// =========================================================================
// Load
// =========================================================================

#[test]
#[serial]
fn given_no_config_file_when_load_then_ok_with_defaults() {
    // Given
    let _temp = setup_config_dir();

    // When
    let result = Config::load();

    // Then
    assert_that!(result, ok(anything()));
    let config = result.unwrap();
    assert_that!(
        config.supervisor.startup_timeout_secs,
        eq(crate::DEFAULT_STARTUP_TIMEOUT_SECS)
    );
    assert_that!(
        config.supervisor.log_buffer_lines,
        eq(crate::DEFAULT_LOG_BUFFER_LINES)
    );
    assert_that!(config.supervisor.default_file.as_str(), eq("slides.md"));
    assert_that!(config.ai.provider.as_str(), eq("ollama"));
}

#[test]
#[serial]
fn given_no_config_file_when_load_and_validate_then_ok() {
    // Given
    let _temp = setup_config_dir();

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, ok(anything()));
}

#[test]
#[serial]
fn given_missing_config_dir_when_load_then_directory_is_created() {
    // Given
    let temp = tempfile::TempDir::new().unwrap();
    let nested = temp.path().join("nested").join("studio");

    // When
    let result = Config::load_from(&nested);

    // Then
    assert_that!(result, ok(anything()));
    assert!(nested.is_dir());
}

#[test]
#[serial]
fn given_valid_toml_file_when_load_then_uses_toml_values() {
    // Given
    let (temp, _guard) = setup_config_dir();
    std::fs::write(
        temp.path().join(CONFIG_FILENAME),
        r#"
              [supervisor]
              startup_timeout_secs = 12
              default_file = "talk.md"

              [ai]
              provider = "openai"
              model = "gpt-4o"
          "#,
    )
    .unwrap();

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.supervisor.startup_timeout_secs, eq(12));
    assert_that!(config.supervisor.default_file.as_str(), eq("talk.md"));
    assert_that!(config.supervisor.log_buffer_lines, eq(100));
    assert_that!(config.ai.provider.as_str(), eq("openai"));
    assert_that!(config.ai.model.as_str(), eq("gpt-4o"));
}

#[test]
#[serial]
fn given_env_var_and_toml_when_load_then_env_var_overrides_toml() {
    // Given
    let (temp, _guard) = setup_config_dir();
    std::fs::write(
        temp.path().join(CONFIG_FILENAME),
        "[supervisor]\nstartup_timeout_secs = 12",
    )
    .unwrap();
    let _timeout = EnvGuard::set("STUDIO_STARTUP_TIMEOUT_SECS", "7");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.supervisor.startup_timeout_secs, eq(7));
}

#[test]
#[serial]
fn given_unparseable_env_var_when_load_then_keeps_previous_value() {
    // Given
    let _temp = setup_config_dir();
    let _timeout = EnvGuard::set("STUDIO_STARTUP_TIMEOUT_SECS", "soon");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(
        config.supervisor.startup_timeout_secs,
        eq(crate::DEFAULT_STARTUP_TIMEOUT_SECS)
    );
}

#[test]
#[serial]
fn given_malformed_toml_when_load_then_toml_error() {
    // Given
    let (temp, _guard) = setup_config_dir();
    std::fs::write(temp.path().join(CONFIG_FILENAME), "[supervisor\nbroken").unwrap();

    // When
    let result = Config::load();

    // Then
    assert!(matches!(result, Err(ConfigError::Toml { .. })));
}

// =========================================================================
// Save
// =========================================================================

#[test]
#[serial]
fn given_modified_config_when_save_then_load_returns_same_values() {
    // Given
    let (temp, _guard) = setup_config_dir();
    let mut config = Config::load().unwrap();
    config.ai.provider = String::from("deepseek");
    config.ai.api_key = String::from("sk-secret");
    config.supervisor.startup_timeout_secs = 20;

    // When
    let path = config.save(temp.path()).unwrap();
    let reloaded = Config::load().unwrap();

    // Then
    assert_eq!(path, temp.path().join(CONFIG_FILENAME));
    assert_that!(reloaded.ai.provider.as_str(), eq("deepseek"));
    assert_that!(reloaded.ai.api_key.as_str(), eq("sk-secret"));
    assert_that!(reloaded.supervisor.startup_timeout_secs, eq(20));
    assert!(!temp.path().join("config.toml.tmp").exists());
}

#[test]
fn given_api_key_when_debug_formatted_then_key_is_masked() {
    // Given
    let mut config = Config::default();
    config.ai.api_key = String::from("sk-secret");

    // When
    let debug = format!("{:?}", config);

    // Then
    assert!(!debug.contains("sk-secret"));
    assert!(debug.contains("***"));
}

// =========================================================================
// Validation
// =========================================================================

#[test]
#[serial]
fn given_unknown_ai_provider_when_validate_then_error() {
    // Given
    let _temp = setup_config_dir();
    let _provider = EnvGuard::set("STUDIO_AI_PROVIDER", "carrier-pigeon");

    // When
    let result = Config::load().unwrap().validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_log_dir_escaping_config_dir_when_validate_then_error() {
    // Given
    let _temp = setup_config_dir();
    let _dir = EnvGuard::set("STUDIO_LOG_DIR", "../elsewhere");

    // When
    let result = Config::load().unwrap().validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
fn given_empty_repo_owner_when_validate_then_error() {
    // Given
    let mut config = Config::default();
    config.updates.repo_owner = String::new();

    // When
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}
