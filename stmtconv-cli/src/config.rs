use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use stmtconv_core::SortKey;
use stmtconv_export::OutputNames;
use stmtconv_ingest::{BackendKind, PatternConfig};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputSection,
    pub extract: ExtractSection,
    pub sort: SortSection,
    pub patterns: PatternConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub dir: PathBuf,
    #[serde(flatten)]
    pub names: OutputNames,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractSection {
    pub backend: BackendKind,
    /// For backend = "pdftotext": command to execute (default: "pdftotext")
    pub pdftotext_command: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortSection {
    pub by: SortKey,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            names: OutputNames::default(),
        }
    }
}

impl Default for ExtractSection {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            pdftotext_command: "pdftotext".to_string(),
        }
    }
}

/// `$STMTCONV_HOME`, else `~/.stmtconv`.
pub fn config_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("STMTCONV_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".stmtconv"))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Load `explicit` if given (it must exist), else the home config if present,
/// else defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let p = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let p = config_path()?;
            if !p.exists() {
                return Ok(Config::default());
            }
            p
        }
    };
    load_config_from(&p)
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(cfg: &Config, p: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let dir = config_dir()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    let p = dir.join("config.toml");
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let cfg = Config::default();
    save_config(&cfg, &p)?;
    println!("Wrote {}", p.display());
    Ok(())
}
