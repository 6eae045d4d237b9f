//! One generation pass: source file in, merged template out.
//!
//! All I/O lives here. The core steps in between ([`resolve`], [`project`],
//! [`merge`]) are pure and receive everything they need as arguments.
//!
//! An existing template that cannot be read or decoded is never fatal; the
//! pass continues as if there were none. Every other failure aborts before the
//! template is touched.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::document::Document;
use crate::error::TemplateError;
use crate::format::TemplateFormat;
use crate::merge::merge;
use crate::project::project;
use crate::resolve::resolve;
use crate::settings::GeneratorSettings;
use crate::source::SourceFile;

/// What to generate and where to put it.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    /// Go source file holding the root type.
    pub source: PathBuf,
    /// Name of the root struct.
    pub root_type: String,
    /// Template path to use instead of the one derived from `source`.
    pub output: Option<PathBuf>,
    /// Render the merged template instead of writing it.
    pub to_stdout: bool,
}

impl GenerateRequest {
    pub fn new(source: impl Into<PathBuf>, root_type: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            root_type: root_type.into(),
            output: None,
            to_stdout: false,
        }
    }

    /// The template this request reads and (unless rendering) writes.
    pub fn template_path(&self, settings: &GeneratorSettings) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => settings.template_path(&self.source),
        }
    }
}

/// Result of a generation pass. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerateOutcome {
    /// The template was written; `keys` counts its leaves.
    Written { path: PathBuf, keys: usize },
    /// The encoded template, for printing.
    Rendered(String),
}

impl fmt::Display for GenerateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateOutcome::Written { path, keys } => {
                write!(f, "Template written to {} ({keys} keys)", path.display())
            }
            GenerateOutcome::Rendered(text) => write!(f, "{}", text.trim_end_matches('\n')),
        }
    }
}

/// Run one pass: read, resolve, project, merge, encode, and write or render.
pub fn generate(
    request: &GenerateRequest,
    settings: &GeneratorSettings,
) -> Result<GenerateOutcome, TemplateError> {
    let source = SourceFile::read(&request.source)?;
    debug!(package = %source.package, decls = source.decls.len(), "parsed source");
    let tree = resolve(&source, &request.root_type, &settings.tag_key)?;
    let fresh = project(&tree);

    let template_path = request.template_path(settings);
    let existing = read_existing(&template_path, settings.format);
    let merged = merge(fresh, existing);

    let text = settings
        .format
        .encode(&merged, settings.style())
        .map_err(|reason| TemplateError::Encode {
            path: template_path.clone(),
            reason,
        })?;

    if request.to_stdout {
        return Ok(GenerateOutcome::Rendered(text));
    }

    write_template(&template_path, &text)?;
    let keys = merged.leaf_count();
    info!(path = %template_path.display(), keys, "wrote template");
    Ok(GenerateOutcome::Written {
        path: template_path,
        keys,
    })
}

/// Load the previous template, falling back to an empty document.
fn read_existing(path: &Path, format: TemplateFormat) -> Document {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no existing template");
            return Document::new();
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable template");
            return Document::new();
        }
    };

    match format.decode(&text) {
        Ok(doc) => {
            debug!(path = %path.display(), keys = doc.leaf_count(), "loaded existing template");
            doc
        }
        Err(reason) => {
            warn!(path = %path.display(), %reason, "ignoring malformed template");
            Document::new()
        }
    }
}

fn write_template(path: &Path, text: &str) -> Result<(), TemplateError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| TemplateError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::write(path, text).map_err(|e| TemplateError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}
