//! Init argument template rendering
//!
//! Templates are Candid text with `{identifier}` placeholders. Substitution is
//! a single left-to-right pass: replacement text is never scanned again, and
//! braces that do not form a known placeholder are copied as-is, which keeps
//! Candid `record { ... }` syntax intact.

use std::path::{Path, PathBuf};

use crate::common::{Error, Result, Settings};

/// Replace every known `{key}` in `template` with its value
///
/// When a key appears more than once in `values`, the first entry wins.
pub fn substitute(template: &str, values: &[(String, String)]) -> String {
    let lookup = |key: &str| {
        values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    };

    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        // The placeholder ends at the first '}' unless another '{' comes first
        if let Some(close) = after.find(['{', '}']) {
            if after.as_bytes()[close] == b'}' {
                if let Some(value) = lookup(&after[..close]) {
                    out.push_str(value);
                    rest = &after[close + 1..];
                    continue;
                }
            }
        }

        out.push('{');
        rest = after;
    }

    out.push_str(rest);
    out
}

/// Writes rendered templates to `<rendered-dir>/<name>.<rendered-ext>`
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    output_dir: PathBuf,
    template_extension: String,
    rendered_extension: String,
}

impl TemplateRenderer {
    pub fn new(
        output_dir: impl Into<PathBuf>,
        template_extension: impl Into<String>,
        rendered_extension: impl Into<String>,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            template_extension: template_extension.into(),
            rendered_extension: rendered_extension.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            &settings.rendered_dir,
            &settings.template_extension,
            &settings.rendered_extension,
        )
    }

    /// Output path for a template, derived from its base name
    pub fn output_path(&self, template_path: &Path) -> PathBuf {
        let file_name = template_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let suffix = format!(".{}", self.template_extension);
        let base = match file_name.strip_suffix(&suffix) {
            Some(base) if !base.is_empty() => base.to_string(),
            _ => template_path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or(file_name),
        };
        self.output_dir
            .join(format!("{}.{}", base, self.rendered_extension))
    }

    /// Render a template and write the result, overwriting earlier output
    pub fn render(&self, template_path: &Path, values: &[(String, String)]) -> Result<PathBuf> {
        if !template_path.is_file() {
            return Err(Error::TemplateNotFound(template_path.display().to_string()));
        }

        let template = std::fs::read_to_string(template_path)
            .map_err(|e| Error::file_read(template_path, &e))?;
        let rendered = substitute(&template, values);

        std::fs::create_dir_all(&self.output_dir)
            .map_err(|e| Error::file_write(&self.output_dir, &e))?;
        let output = self.output_path(template_path);
        std::fs::write(&output, rendered).map_err(|e| Error::file_write(&output, &e))?;

        tracing::debug!(
            template = %template_path.display(),
            output = %output.display(),
            "rendered template"
        );
        Ok(output)
    }
}
