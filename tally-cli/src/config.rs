use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tally_finance::{CategoryRules, PipelineConfig};
use tally_ingest::upload::default_upload_dir;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub pipeline: PipelineConfig,
    pub output: OutputSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Indented JSON (default) or a single line
    pub pretty: bool,
    /// Where stdin uploads are staged while parsing
    pub upload_dir: Option<PathBuf>,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            pretty: true,
            upload_dir: None,
        }
    }
}

impl OutputSection {
    pub fn upload_dir(&self) -> PathBuf {
        self.upload_dir.clone().unwrap_or_else(default_upload_dir)
    }
}

impl Config {
    /// Defaults with the built-in category rules written out, so they can be edited
    pub fn with_builtin_rules() -> Self {
        let mut cfg = Config::default();
        cfg.pipeline.rules = Some(CategoryRules::builtin().rules().to_vec());
        cfg
    }
}

/// `~/.tally`
pub fn tally_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".tally"))
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(tally_home()?.join("config.toml"))
}

/// Load `explicit` (which must exist), else `~/.tally/config.toml` if present,
/// else defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let p = match explicit {
        Some(p) => {
            if !p.exists() {
                bail!("config not found: {}", p.display());
            }
            p.to_path_buf()
        }
        None => match default_config_path() {
            Ok(p) if p.exists() => p,
            _ => return Ok(Config::default()),
        },
    };
    read_config(&p)
}

pub fn read_config(p: &Path) -> Result<Config> {
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(cfg: &Config, p: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

/// Write the default config to `explicit`, or `~/.tally/config.toml`.
pub fn init_config(explicit: Option<&Path>, force: bool) -> Result<PathBuf> {
    let p = match explicit {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };
    if let Some(dir) = p.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    if p.exists() && !force {
        println!("Config already exists: {} (use --force to overwrite)", p.display());
        return Ok(p);
    }
    save_config(&Config::with_builtin_rules(), &p)?;
    println!("Wrote {}", p.display());
    Ok(p)
}
