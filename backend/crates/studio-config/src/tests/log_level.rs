use crate::{Config, LogLevel};

use std::str::FromStr;

use log::LevelFilter;

#[test]
fn given_mixed_case_level_when_parsed_then_matches() {
    assert_eq!(LogLevel::from_str("DeBuG").unwrap(), LogLevel(LevelFilter::Debug));
    assert_eq!(LogLevel::from_str("warn").unwrap(), LogLevel(LevelFilter::Warn));
}

#[test]
fn given_unknown_level_when_parsed_then_defaults_to_info() {
    assert_eq!(LogLevel::from_str("chatty").unwrap(), LogLevel(LevelFilter::Info));
}

#[test]
fn given_level_when_serialized_then_written_as_lowercase_directive() {
    let mut config = Config::default();
    config.logging.level = LogLevel(LevelFilter::Trace);

    let toml = toml::to_string(&config).unwrap();

    assert!(toml.contains("level = \"trace\""));
    assert_eq!(config.logging.level.as_directive(), "trace");
}

#[test]
fn given_toml_with_unknown_level_when_deserialized_then_info() {
    let config: Config = toml::from_str("[logging]\nlevel = \"loud\"").unwrap();

    assert_eq!(*config.logging.level, LevelFilter::Info);
}
