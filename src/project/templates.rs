//! Matches canisters to `<templates-dir>/<name>.<ext>` init argument templates

use std::path::{Path, PathBuf};

use super::manifest::Canisters;

/// Template path a canister would use, whether or not it exists
pub fn template_candidate(templates_dir: &Path, canister: &str, extension: &str) -> PathBuf {
    templates_dir.join(format!("{}.{}", canister, extension))
}

/// Attach existing template files to their canisters
///
/// A canister whose template file does not exist gets `None`, so a stored
/// path always points at a real file. Returns the number of templates found.
/// A missing directory is left for the caller to report.
pub fn locate_templates(canisters: &mut Canisters, templates_dir: &Path, extension: &str) -> usize {
    let mut found = 0;
    for canister in canisters.iter_mut() {
        let candidate = template_candidate(templates_dir, &canister.name, extension);
        canister.info.template_path = if candidate.is_file() {
            found += 1;
            Some(candidate)
        } else {
            None
        };
    }

    tracing::debug!(
        dir = %templates_dir.display(),
        found,
        total = canisters.len(),
        "located templates"
    );
    found
}
