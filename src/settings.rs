//! Generator settings: what tag names keys, how templates are encoded, and
//! where they are written.
//!
//! Settings are layered, lowest priority first:
//!
//! 1. compiled defaults (the `#[config(default)]` attributes below)
//! 2. settings files, in discovery order (see [`file`](crate::file))
//! 3. `VIPER_TEMPLATE_*` environment variables
//! 4. command-line overrides
//!
//! [`resolve_settings`] does no I/O; it takes every layer pre-loaded so the
//! whole precedence chain can be tested with synthetic input. [`load`] gathers
//! the real files and environment and then calls it.

use std::path::{Path, PathBuf};

use confique::Config;
use serde::{Deserialize, Serialize};
use toml::{Table, Value};
use tracing::debug;

use crate::error::TemplateError;
use crate::file;
use crate::format::{Style, TemplateFormat};

/// Prefix of environment variables that override settings
/// (`VIPER_TEMPLATE_TAG_KEY`, `VIPER_TEMPLATE_FORMAT`, ...).
pub const ENV_PREFIX: &str = "VIPER_TEMPLATE_";

/// Deepest indent accepted for pretty JSON.
const MAX_INDENT: usize = 16;

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GeneratorSettings {
    /// Struct tag key whose value names a template key.
    #[config(default = "mapstructure")]
    pub tag_key: String,

    /// Template encoding, `json` or `toml`.
    #[config(default = "json")]
    pub format: TemplateFormat,

    /// Pretty-print the template. When false, JSON is written on one line
    /// and TOML uses inline tables.
    #[config(default = true)]
    pub pretty: bool,

    /// Spaces per nesting level in pretty JSON.
    #[config(default = 2)]
    pub indent: usize,

    /// Final extension of the template file. Empty means none.
    #[config(default = "template")]
    pub suffix: String,
}

impl GeneratorSettings {
    pub fn style(&self) -> Style {
        Style {
            pretty: self.pretty,
            indent: self.indent,
        }
    }

    /// Template path for `source` under these settings.
    pub fn template_path(&self, source: &Path) -> PathBuf {
        self.format.template_path(source, &self.suffix)
    }
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            tag_key: "mapstructure".into(),
            format: TemplateFormat::Json,
            pretty: true,
            indent: 2,
            suffix: "template".into(),
        }
    }
}

/// Every layer needed to resolve settings. No I/O happens here.
#[derive(Debug, Default)]
pub struct SettingsInput {
    /// File contents, first = lowest priority.
    pub files: Vec<(PathBuf, String)>,
    /// Raw environment pairs; only `VIPER_TEMPLATE_*` names are looked at.
    pub env_vars: Vec<(String, String)>,
    /// Command-line overrides as `(key, value)` pairs, highest priority.
    pub overrides: Vec<(String, Value)>,
}

/// Resolve settings from pre-loaded layers.
///
/// Each file is checked for unknown keys before it is merged. Settings are
/// flat, so a later layer simply replaces the keys it sets.
pub fn resolve_settings(input: SettingsInput) -> Result<GeneratorSettings, TemplateError> {
    let mut merged = Table::new();
    for (path, content) in &input.files {
        validate_unknown_keys(content, path)?;
        let table: Table = toml::from_str(content).map_err(|e| TemplateError::SettingsParse {
            path: path.clone(),
            source: e,
        })?;
        debug!(path = %path.display(), keys = table.len(), "applying settings file");
        merged.extend(table);
    }

    merged.extend(env_to_table(input.env_vars));
    merged.extend(input.overrides);

    let layer: <GeneratorSettings as Config>::Layer =
        Value::Table(merged)
            .try_into()
            .map_err(|e: toml::de::Error| TemplateError::InvalidSetting {
                key: "<merged>".into(),
                reason: e.to_string(),
            })?;

    let settings = GeneratorSettings::builder().preloaded(layer).load()?;
    check(&settings)?;
    Ok(settings)
}

/// Discover settings files, read the environment, and resolve.
///
/// `explicit` is a settings file named on the command line; unlike the
/// discovered files it must exist.
pub fn load(
    explicit: Option<&Path>,
    overrides: Vec<(String, Value)>,
) -> Result<GeneratorSettings, TemplateError> {
    let files = file::load_settings_files(&file::settings_dirs(), explicit)?;
    resolve_settings(SettingsInput {
        files,
        env_vars: std::env::vars().collect(),
        overrides,
    })
}

/// Reject settings files that carry keys [`GeneratorSettings`] doesn't know.
fn validate_unknown_keys(content: &str, path: &Path) -> Result<(), TemplateError> {
    let mut unknown: Vec<String> = Vec::new();

    let deserializer = toml::Deserializer::new(content);
    let _layer: <GeneratorSettings as Config>::Layer =
        serde_ignored::deserialize(deserializer, |ignored| unknown.push(ignored.to_string()))
            .map_err(|e| TemplateError::SettingsParse {
                path: path.to_path_buf(),
                source: e,
            })?;

    if unknown.is_empty() {
        return Ok(());
    }
    Err(TemplateError::UnknownSettingsKeys {
        path: path.to_path_buf(),
        keys: unknown,
    })
}

/// Build a table from `VIPER_TEMPLATE_<KEY>` variables.
///
/// The remainder of the name is lowercased and kept only if it names a
/// settings field. Values are typed by the field they set; text that doesn't
/// parse is passed through as a string so the layer reports the mismatch.
fn env_to_table(vars: impl IntoIterator<Item = (String, String)>) -> Table {
    let known: Vec<&str> = GeneratorSettings::META
        .fields
        .iter()
        .map(|field| field.name)
        .collect();

    let mut table = Table::new();
    for (name, raw) in vars {
        let Some(rest) = name.strip_prefix(ENV_PREFIX) else {
            continue;
        };
        let key = rest.to_lowercase();
        if !known.contains(&key.as_str()) {
            continue;
        }
        debug!(var = %name, "applying environment override");
        let value = parse_env_value(&key, raw);
        table.insert(key, value);
    }
    table
}

fn parse_env_value(key: &str, raw: String) -> Value {
    match key {
        "pretty" if raw.eq_ignore_ascii_case("true") => Value::Boolean(true),
        "pretty" if raw.eq_ignore_ascii_case("false") => Value::Boolean(false),
        "indent" => match raw.trim().parse::<i64>() {
            Ok(i) => Value::Integer(i),
            Err(_) => Value::String(raw),
        },
        _ => Value::String(raw),
    }
}

fn check(settings: &GeneratorSettings) -> Result<(), TemplateError> {
    if settings.tag_key.is_empty() {
        return Err(TemplateError::InvalidSetting {
            key: "tag_key".into(),
            reason: "must not be empty".into(),
        });
    }
    if settings.indent > MAX_INDENT {
        return Err(TemplateError::InvalidSetting {
            key: "indent".into(),
            reason: format!("{} exceeds the maximum of {MAX_INDENT}", settings.indent),
        });
    }
    Ok(())
}
