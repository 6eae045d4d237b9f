//! Generate editable configuration templates from Go struct declarations.
//!
//! Viper-style Go services describe their configuration as a tree of structs
//! whose fields carry `mapstructure:"..."` tags. This crate reads such a
//! source file, expands a named root struct into a tree of keys, and writes a
//! template with a placeholder for every key. Re-running it keeps every value
//! already written in the template and only adds or drops keys as the struct
//! changes.
//!
//! ```ignore
//! let settings = viper_template::settings::load(None, vec![])?;
//! let request = GenerateRequest::new("config/config.go", "Config");
//! let outcome = viper_template::generate(&request, &settings)?;
//! println!("{outcome}");
//! ```
//!
//! # Pipeline
//!
//! One pass runs three pure steps between reading and writing files:
//!
//! 1. [`resolve`] walks the root struct through the parsed source and builds a
//!    [`TypeNode`] tree. Nested structs are followed whether written inline,
//!    by name, or behind pointers.
//! 2. [`project`] turns the tree into a fresh [`Document`] with a placeholder
//!    for every leaf: `""` for strings, `false` for bools, `0` for integers,
//!    `0.0` for floats, and `null` for everything else.
//! 3. [`merge`] overlays the previous template on the fresh document. Keys come
//!    from the fresh side; values from the previous template win.
//!
//! The merged document is encoded as JSON (pretty by default, 2-space indent)
//! or TOML and always ends with a newline.
//!
//! # Template path
//!
//! The template lives next to the source file: the source extension is
//! replaced with `.{format}.{suffix}`, so `config.go` becomes
//! `config.json.template`. See [`TemplateFormat::template_path`].
//!
//! # Settings
//!
//! [`GeneratorSettings`] is a [confique](https://docs.rs/confique) struct
//! layered from compiled defaults, `viper-template.toml` files, then
//! `VIPER_TEMPLATE_*` environment variables, then command-line flags. The core
//! never reads process state; it takes settings by reference.
//!
//! # Cargo features
//!
//! - `clap` (default): the [`cli`] module and the `viper-template` binary.
//! - `rich-errors`: derives `miette::Diagnostic` on [`TemplateError`].

pub mod document;
pub mod error;
pub mod file;
pub mod format;
pub mod merge;
pub mod pipeline;
pub mod project;
pub mod resolve;
pub mod settings;
pub mod source;
pub mod tag;
pub mod tree;

#[cfg(feature = "clap")]
pub mod cli;

#[cfg(test)]
pub(crate) mod fixtures;

pub use document::{Document, Node};
pub use error::TemplateError;
pub use format::{Style, TemplateFormat};
pub use merge::merge;
pub use pipeline::{GenerateOutcome, GenerateRequest, generate};
pub use project::project;
pub use resolve::resolve;
pub use settings::GeneratorSettings;
pub use source::SourceFile;
pub use tree::{Kind, TypeNode};
