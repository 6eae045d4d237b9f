use std::fs;
use std::path::Path;

use serde_json::{Value, json};
use tempfile::TempDir;
use viper_template::settings::{SettingsInput, resolve_settings};
use viper_template::{
    GenerateOutcome, GenerateRequest, GeneratorSettings, TemplateError, TemplateFormat, generate,
};

const SERVICE: &str = r#"package service

import (
	"net/url"
	"time"
)

// Config is loaded by viper at startup.
type Config struct {
	Listen   string        `mapstructure:"listen"`
	Verbose  bool          `mapstructure:"verbose"`
	Upstream *url.URL      `mapstructure:"upstream"`
	Storage  *StorageAlias `mapstructure:"storage"`
	Retry    RetryPolicy   `mapstructure:"retry,squash"`
	Labels   map[string]string `mapstructure:"labels"`
}

type StorageAlias = Storage

type Storage struct {
	Path     string  `mapstructure:"path"`
	Quota    *uint64 `mapstructure:"quota"`
	Replicas int     `mapstructure:"replicas"`
}

type RetryPolicy struct {
	Attempts int           `mapstructure:"attempts"`
	Backoff  time.Duration `mapstructure:"backoff"`
	Jitter   float32       `mapstructure:"jitter"`
}

func (c *Config) Validate() error { return nil }
"#;

fn write_source(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("service.go");
    fs::write(&path, SERVICE).unwrap();
    path
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn first_run_writes_placeholders() {
    let dir = TempDir::new().unwrap();
    let source = write_source(&dir);

    let outcome = generate(
        &GenerateRequest::new(&source, "Config"),
        &GeneratorSettings::default(),
    )
    .unwrap();

    let template = dir.path().join("service.json.template");
    assert!(matches!(outcome, GenerateOutcome::Written { ref path, .. } if path == &template));
    assert_eq!(
        read_json(&template),
        json!({
            "listen": "",
            "verbose": false,
            "upstream": null,
            "storage": {"path": "", "quota": 0, "replicas": 0},
            "retry": {"attempts": 0, "backoff": null, "jitter": 0.0},
            "labels": null
        })
    );
}

#[test]
fn keys_follow_declaration_order() {
    let dir = TempDir::new().unwrap();
    let source = write_source(&dir);
    generate(
        &GenerateRequest::new(&source, "Config"),
        &GeneratorSettings::default(),
    )
    .unwrap();

    let text = fs::read_to_string(dir.path().join("service.json.template")).unwrap();
    let positions: Vec<usize> = [
        "\"listen\"",
        "\"verbose\"",
        "\"upstream\"",
        "\"storage\"",
        "\"retry\"",
        "\"labels\"",
    ]
    .iter()
    .map(|key| text.find(key).unwrap())
    .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(text.ends_with("}\n"));
}

#[test]
fn second_run_keeps_edits_and_drops_removed_keys() {
    let dir = TempDir::new().unwrap();
    let source = write_source(&dir);
    let template = dir.path().join("service.json.template");
    fs::write(
        &template,
        r#"{
  "listen": ":8080",
  "upstream": "https://example.com",
  "storage": {"path": "/var/data", "quota": 1024},
  "labels": {"team": "core"},
  "removed": {"old": true}
}
"#,
    )
    .unwrap();

    generate(
        &GenerateRequest::new(&source, "Config"),
        &GeneratorSettings::default(),
    )
    .unwrap();

    assert_eq!(
        read_json(&template),
        json!({
            "listen": ":8080",
            "verbose": false,
            "upstream": "https://example.com",
            "storage": {"path": "/var/data", "quota": 1024, "replicas": 0},
            "retry": {"attempts": 0, "backoff": null, "jitter": 0.0},
            "labels": {"team": "core"}
        })
    );
}

#[test]
fn regenerating_is_stable() {
    let dir = TempDir::new().unwrap();
    let source = write_source(&dir);
    let request = GenerateRequest::new(&source, "Config");
    let settings = GeneratorSettings::default();

    generate(&request, &settings).unwrap();
    let first = fs::read_to_string(dir.path().join("service.json.template")).unwrap();
    generate(&request, &settings).unwrap();
    let second = fs::read_to_string(dir.path().join("service.json.template")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn unknown_root_is_fatal() {
    let dir = TempDir::new().unwrap();
    let source = write_source(&dir);

    let result = generate(
        &GenerateRequest::new(&source, "Settings"),
        &GeneratorSettings::default(),
    );
    match result {
        Err(TemplateError::RootNotFound(name)) => assert_eq!(name, "Settings"),
        other => panic!("Expected RootNotFound, got {other:?}"),
    }
    assert!(!dir.path().join("service.json.template").exists());
}

#[test]
fn settings_file_selects_toml_output() {
    let dir = TempDir::new().unwrap();
    let source = write_source(&dir);
    let settings = resolve_settings(SettingsInput {
        files: vec![(
            dir.path().join("viper-template.toml"),
            "format = \"toml\"\nsuffix = \"example\"\n".into(),
        )],
        ..Default::default()
    })
    .unwrap();
    assert_eq!(settings.format, TemplateFormat::Toml);

    generate(&GenerateRequest::new(&source, "Config"), &settings).unwrap();

    let text = fs::read_to_string(dir.path().join("service.toml.example")).unwrap();
    assert!(text.contains("listen = \"\""));
    assert!(text.contains("[storage]"));
    assert!(text.contains("replicas = 0"));
    assert!(text.contains("upstream = \"\""));
}

#[test]
fn compact_output_is_one_line() {
    let dir = TempDir::new().unwrap();
    let source = write_source(&dir);
    let settings = GeneratorSettings {
        pretty: false,
        ..Default::default()
    };

    let request = GenerateRequest {
        to_stdout: true,
        ..GenerateRequest::new(&source, "Config")
    };
    match generate(&request, &settings).unwrap() {
        GenerateOutcome::Rendered(text) => {
            assert_eq!(text.lines().count(), 1);
            assert!(text.starts_with("{\"listen\":\"\""));
            assert!(text.ends_with('\n'));
        }
        other => panic!("Expected Rendered, got {other:?}"),
    }
}
