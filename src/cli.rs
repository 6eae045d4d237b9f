//! Clap adapter for the `viper-template` binary.
//!
//! Compiled only with the `clap` feature (on by default). [`Cli`] parses the
//! command line; [`Cli::request`] and [`Cli::overrides`] split it into the
//! clap-free [`GenerateRequest`] and the settings overrides that sit on top of
//! every other settings layer.

use std::path::PathBuf;

use clap::Parser;
use toml::Value;

use crate::format::TemplateFormat;
use crate::pipeline::GenerateRequest;

/// Generate a config template from a Go struct, keeping values already in it.
#[derive(Debug, Parser)]
#[command(name = "viper-template", version)]
pub struct Cli {
    /// Go source file declaring the root type.
    pub source: PathBuf,

    /// Name of the root struct.
    #[arg(long = "type", value_name = "NAME")]
    pub root_type: String,

    /// Template format.
    #[arg(long, value_enum)]
    pub format: Option<TemplateFormat>,

    /// Same as `--format json`.
    #[arg(long, conflicts_with = "format")]
    pub json: bool,

    /// Write compact output instead of pretty-printing.
    #[arg(long)]
    pub compact: bool,

    /// Struct tag key that names template keys.
    #[arg(long, value_name = "KEY")]
    pub tag: Option<String>,

    /// Template path to read and write instead of the derived one.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Print the merged template instead of writing it.
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,

    /// Settings file applied after the discovered ones.
    #[arg(long, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn request(&self) -> GenerateRequest {
        GenerateRequest {
            source: self.source.clone(),
            root_type: self.root_type.clone(),
            output: self.output.clone(),
            to_stdout: self.stdout,
        }
    }

    /// Settings set by flags, as `(key, value)` pairs. Flags left out
    /// contribute nothing, so lower layers keep their values.
    pub fn overrides(&self) -> Vec<(String, Value)> {
        let mut overrides = Vec::new();
        if let Some(tag) = &self.tag {
            overrides.push(("tag_key".to_string(), Value::String(tag.clone())));
        }
        let format = if self.json {
            Some(TemplateFormat::Json)
        } else {
            self.format
        };
        if let Some(format) = format {
            overrides.push(("format".to_string(), Value::String(format.to_string())));
        }
        if self.compact {
            overrides.push(("pretty".to_string(), Value::Boolean(false)));
        }
        overrides
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn minimal_invocation() {
        let cli = parse(&["viper-template", "config.go", "--type", "Config"]);
        assert_eq!(cli.source, PathBuf::from("config.go"));
        assert_eq!(cli.root_type, "Config");
        assert!(cli.overrides().is_empty());
        assert_eq!(cli.request(), GenerateRequest::new("config.go", "Config"));
    }

    #[test]
    fn type_is_required() {
        assert!(Cli::try_parse_from(["viper-template", "config.go"]).is_err());
    }

    #[test]
    fn source_is_required() {
        assert!(Cli::try_parse_from(["viper-template", "--type", "Config"]).is_err());
    }

    #[test]
    fn format_and_compact_become_overrides() {
        let cli = parse(&[
            "viper-template",
            "config.go",
            "--type",
            "Config",
            "--format",
            "toml",
            "--compact",
        ]);
        assert_eq!(
            cli.overrides(),
            vec![
                ("format".to_string(), Value::String("toml".into())),
                ("pretty".to_string(), Value::Boolean(false)),
            ]
        );
    }

    #[test]
    fn json_flag_selects_json() {
        let cli = parse(&["viper-template", "config.go", "--type", "Config", "--json"]);
        assert_eq!(
            cli.overrides(),
            vec![("format".to_string(), Value::String("json".into()))]
        );
    }

    #[test]
    fn json_conflicts_with_format() {
        let result = Cli::try_parse_from([
            "viper-template",
            "config.go",
            "--type",
            "Config",
            "--json",
            "--format",
            "toml",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_format_is_rejected() {
        let result = Cli::try_parse_from([
            "viper-template",
            "config.go",
            "--type",
            "Config",
            "--format",
            "yaml",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn tag_becomes_tag_key_override() {
        let cli = parse(&["viper-template", "config.go", "--type", "Config", "--tag", "json"]);
        assert_eq!(
            cli.overrides(),
            vec![("tag_key".to_string(), Value::String("json".into()))]
        );
    }

    #[test]
    fn output_and_stdout_conflict() {
        let result = Cli::try_parse_from([
            "viper-template",
            "config.go",
            "--type",
            "Config",
            "-o",
            "out.json",
            "--stdout",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn request_carries_output_and_stdout() {
        let cli = parse(&["viper-template", "config.go", "--type", "Config", "--stdout"]);
        assert!(cli.request().to_stdout);

        let cli = parse(&["viper-template", "config.go", "--type", "Config", "-o", "t.json"]);
        assert_eq!(cli.request().output, Some(PathBuf::from("t.json")));
    }

    #[test]
    fn verbose_counts() {
        let cli = parse(&["viper-template", "config.go", "--type", "Config", "-vvv"]);
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn settings_path() {
        let cli = parse(&[
            "viper-template",
            "config.go",
            "--type",
            "Config",
            "--settings",
            "custom.toml",
        ]);
        assert_eq!(cli.settings, Some(PathBuf::from("custom.toml")));
    }
}
