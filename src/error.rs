use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[cfg_attr(feature = "rich-errors", derive(miette::Diagnostic))]
pub enum TemplateError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}:{line}:{column}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Couldn't find root type '{0}'")]
    RootNotFound(String),

    #[error("Root type '{0}' is not a struct")]
    RootNotStruct(String),

    #[error("Type '{0}' has type parameters; generic structs are not supported")]
    GenericType(String),

    #[error(
        "Field '{field}' (line {line}) points to '{target}', which is not declared in the source file"
    )]
    UnresolvedPointer {
        field: String,
        target: String,
        line: usize,
    },

    #[error("Type '{0}' refers to itself; cyclic types cannot be expanded into a template")]
    CyclicType(String),

    #[error("Failed to encode template for {path}: {reason}")]
    Encode { path: PathBuf, reason: String },

    #[error("Settings error: {0}")]
    Settings(#[from] confique::Error),

    #[error("Failed to parse settings file {path}: {source}")]
    SettingsParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Unknown keys in settings file {path}: {}", keys.join(", "))]
    UnknownSettingsKeys { path: PathBuf, keys: Vec<String> },

    #[error("Invalid value for setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_not_found_names_the_type() {
        let err = TemplateError::RootNotFound("AppConfig".into());
        assert!(err.to_string().contains("'AppConfig'"));
    }

    #[test]
    fn parse_error_formats_location() {
        let err = TemplateError::Parse {
            path: "config/config.go".into(),
            line: 12,
            column: 7,
            message: "expected '}'".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("config/config.go:12:7"));
        assert!(msg.contains("expected '}'"));
    }

    #[test]
    fn unresolved_pointer_formats() {
        let err = TemplateError::UnresolvedPointer {
            field: "Server".into(),
            target: "ServerConfig".into(),
            line: 14,
        };
        let msg = err.to_string();
        assert!(msg.contains("line 14"));
        assert!(msg.contains("Server"));
        assert!(msg.contains("ServerConfig"));
    }

    #[test]
    fn unknown_settings_keys_lists_all() {
        let err = TemplateError::UnknownSettingsKeys {
            path: "/home/user/.config/viper-template/viper-template.toml".into(),
            keys: vec!["tagkey".into(), "indnet".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("tagkey, indnet"));
    }
}
