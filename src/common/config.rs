//! Configuration file handling
//!
//! The raw [`Config`] mirrors the TOML file. [`Settings`] is the resolved
//! form with absolute paths, built once at startup and passed to every
//! component.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::paths;
use super::{Error, Result};
use crate::console;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Project-relative locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Test script discovery and execution
    #[serde(default)]
    pub scripts: ScriptsConfig,

    /// Init argument templates
    #[serde(default)]
    pub templates: TemplatesConfig,

    /// External platform CLI
    #[serde(default)]
    pub dfx: DfxConfig,
}

/// Project-relative locations
#[derive(Debug, Deserialize)]
pub struct PathsConfig {
    /// Canister manifest
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,

    /// Directory holding the test scripts
    #[serde(default = "default_scripts_dir")]
    pub scripts_dir: PathBuf,

    /// Directory holding `<canister>.template` files
    #[serde(default = "default_templates_dir")]
    pub templates_dir: PathBuf,

    /// Directory receiving rendered argument files
    #[serde(default = "default_rendered_dir")]
    pub rendered_dir: PathBuf,

    /// Directory receiving execution logs
    #[serde(default = "default_logs_dir")]
    pub logs_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            manifest: default_manifest(),
            scripts_dir: default_scripts_dir(),
            templates_dir: default_templates_dir(),
            rendered_dir: default_rendered_dir(),
            logs_dir: default_logs_dir(),
        }
    }
}

fn default_manifest() -> PathBuf {
    PathBuf::from("dfx.json")
}
fn default_scripts_dir() -> PathBuf {
    PathBuf::from("tests")
}
fn default_templates_dir() -> PathBuf {
    PathBuf::from("args_templates")
}
fn default_rendered_dir() -> PathBuf {
    PathBuf::from("args")
}
fn default_logs_dir() -> PathBuf {
    PathBuf::from("logs")
}

/// Test script settings
#[derive(Debug, Deserialize)]
pub struct ScriptsConfig {
    /// File extension (without dot) of listed scripts
    #[serde(default = "default_script_extension")]
    pub extension: String,

    /// Interpreter used to run a script. Empty runs the script directly.
    #[serde(default = "default_interpreter")]
    pub interpreter: String,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            extension: default_script_extension(),
            interpreter: default_interpreter(),
        }
    }
}

fn default_script_extension() -> String {
    "py".to_string()
}

fn default_interpreter() -> String {
    "python3".to_string()
}

/// Template settings
#[derive(Debug, Deserialize)]
pub struct TemplatesConfig {
    /// Extension (without dot) of template files
    #[serde(default = "default_template_extension")]
    pub extension: String,

    /// Extension (without dot) of rendered argument files
    #[serde(default = "default_rendered_extension")]
    pub rendered_extension: String,

    /// Static placeholder values, applied after the runtime ones
    #[serde(default)]
    pub values: BTreeMap<String, String>,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            extension: default_template_extension(),
            rendered_extension: default_rendered_extension(),
            values: BTreeMap::new(),
        }
    }
}

fn default_template_extension() -> String {
    "template".to_string()
}

fn default_rendered_extension() -> String {
    "candid".to_string()
}

/// External CLI settings
#[derive(Debug, Deserialize)]
pub struct DfxConfig {
    /// Program name looked up in PATH, or a path to the binary
    #[serde(default = "default_dfx")]
    pub path: String,

    /// Network passed as `--network` to canister commands
    #[serde(default)]
    pub network: Option<String>,
}

impl Default for DfxConfig {
    fn default() -> Self {
        Self {
            path: default_dfx(),
            network: None,
        }
    }
}

fn default_dfx() -> String {
    "dfx".to_string()
}

impl Config {
    /// Load configuration for a project
    ///
    /// The first existing candidate file wins; with none, the defaults apply.
    /// An unreadable or malformed file is an error here.
    /// [`Settings::load_or_default`] reports it and continues with the
    /// defaults.
    pub fn load(root: &Path) -> Result<Self> {
        for path in paths::config_candidates(root) {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading configuration");
                let content =
                    std::fs::read_to_string(&path).map_err(|e| Error::file_read(&path, &e))?;
                return toml::from_str(&content).map_err(|e| {
                    Error::ConfigParse(format!("{}: {}", path.display(), e))
                });
            }
        }
        Ok(Self::default())
    }

    /// Resolve every path against the project root
    pub fn resolve(self, root: &Path) -> Settings {
        let interpreter = if self.scripts.interpreter.trim().is_empty() {
            None
        } else {
            Some(resolve_program(root, &self.scripts.interpreter))
        };

        Settings {
            root: root.to_path_buf(),
            manifest: paths::resolve(root, &self.paths.manifest),
            scripts_dir: paths::resolve(root, &self.paths.scripts_dir),
            templates_dir: paths::resolve(root, &self.paths.templates_dir),
            rendered_dir: paths::resolve(root, &self.paths.rendered_dir),
            logs_dir: paths::resolve(root, &self.paths.logs_dir),
            script_extension: self.scripts.extension,
            interpreter,
            template_extension: self.templates.extension,
            rendered_extension: self.templates.rendered_extension,
            template_values: self.templates.values.into_iter().collect(),
            dfx: resolve_program(root, &self.dfx.path),
            network: self.dfx.network,
        }
    }
}

/// Resolved settings shared by every component
#[derive(Debug, Clone)]
pub struct Settings {
    pub root: PathBuf,
    pub manifest: PathBuf,
    pub scripts_dir: PathBuf,
    pub templates_dir: PathBuf,
    pub rendered_dir: PathBuf,
    pub logs_dir: PathBuf,
    pub script_extension: String,
    pub interpreter: Option<PathBuf>,
    pub template_extension: String,
    pub rendered_extension: String,
    pub template_values: Vec<(String, String)>,
    pub dfx: PathBuf,
    pub network: Option<String>,
}

impl Settings {
    /// Load the config file for `root` and resolve it
    pub fn load(root: &Path) -> Result<Self> {
        Ok(Config::load(root)?.resolve(root))
    }

    /// Like [`Settings::load`], but an unusable config file is reported on
    /// `out` and replaced by the default configuration
    pub fn load_or_default<W: Write + ?Sized>(root: &Path, out: &mut W) -> io::Result<Self> {
        match Self::load(root) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                tracing::warn!(root = %root.display(), error = %e, "using default configuration");
                console::warning(out, &format!("{}. Using default settings.", e))?;
                Ok(Config::default().resolve(root))
            }
        }
    }
}

/// Locate a program by name in PATH, or resolve it as a project path
///
/// Falls back to the bare name so the spawn error names the missing program
fn resolve_program(root: &Path, program: &str) -> PathBuf {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return paths::resolve(root, candidate);
    }

    match which::which(program) {
        Ok(path) => path,
        Err(_) => {
            tracing::warn!(program, "program not found in PATH");
            PathBuf::from(program)
        }
    }
}
