//! Demo configuration – reads/writes `~/.lambdabt/config.toml`.

use lambdabt_runtime::{ChildEvaluation, SelectionPolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for the sentry demo stored in `~/.lambdabt/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Number of root ticks to run.
    #[serde(default = "default_ticks")]
    pub ticks: u32,

    /// Seed for the idle branch's random source.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Extra patrol steps per patrol tick (`bounded_repeat` bound).
    #[serde(default = "default_patrol_repeats")]
    pub patrol_repeats: usize,

    /// Whether the idle branch's `force_succeed` ticks its child.
    #[serde(default)]
    pub force_child_evaluation: ChildEvaluation,

    /// How the idle branch picks a glance.
    #[serde(default = "default_selection_policy")]
    pub selection_policy: SelectionPolicy,
}

fn default_ticks() -> u32 {
    10
}
fn default_seed() -> u64 {
    42
}
fn default_patrol_repeats() -> usize {
    2
}
fn default_selection_policy() -> SelectionPolicy {
    SelectionPolicy::Shuffled
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ticks: default_ticks(),
            seed: default_seed(),
            patrol_repeats: default_patrol_repeats(),
            force_child_evaluation: ChildEvaluation::default(),
            selection_policy: default_selection_policy(),
        }
    }
}

/// Return the path to `~/.lambdabt/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".lambdabt").join("config.toml")
}

/// Load the config from a specific path.  Returns `None` if the file does not
/// exist.
pub fn load_from(path: &Path) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    let cfg: Config =
        toml::from_str(&raw).map_err(|e| format!("Failed to parse config: {}", e))?;
    Ok(Some(cfg))
}

/// Apply `LAMBDABT_*` overrides resolved through `lookup`, which maps a
/// variable name to its value (`std::env::var` in the binary).
///
/// | Variable | Config field |
/// |---|---|
/// | `LAMBDABT_TICKS` | `ticks` |
/// | `LAMBDABT_SEED` | `seed` |
///
/// Values that do not parse are ignored.
pub fn apply_overrides(cfg: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("LAMBDABT_TICKS")
        && let Ok(ticks) = v.trim().parse::<u32>()
    {
        cfg.ticks = ticks;
    }
    if let Some(v) = lookup("LAMBDABT_SEED")
        && let Ok(seed) = v.trim().parse::<u64>()
    {
        cfg.seed = seed;
    }
}

/// Save the config to a specific path, creating its directory if necessary.
pub fn save_to(cfg: &Config, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }
    let raw =
        toml::to_string_pretty(cfg).map_err(|e| format!("Failed to serialize config: {}", e))?;
    // Owner-only read/write (rw-------) on Unix.
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .and_then(|mut f| {
                use std::io::Write;
                f.write_all(raw.as_bytes())
            })
            .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    }
    #[cfg(not(unix))]
    fs::write(path, raw)
        .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    Ok(())
}
