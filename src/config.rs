use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::gateway::MAX_CONTENT_BYTES;

/// Idle time after the last input before an auto-save.
pub const DEFAULT_DEBOUNCE_MS: u64 = 2000;
/// Hold time that turns a press into an edit gesture.
pub const DEFAULT_LONG_PRESS_MS: u64 = 500;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub no_auto_save: bool,
    pub perf: bool,
    pub debounce_ms: Option<u64>,
    pub long_press_ms: Option<u64>,
    pub max_bytes: Option<usize>,
    pub output: Option<PathBuf>,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            no_auto_save: self.no_auto_save || other.no_auto_save,
            perf: self.perf || other.perf,
            debounce_ms: other.debounce_ms.or(self.debounce_ms),
            long_press_ms: other.long_press_ms.or(self.long_press_ms),
            max_bytes: other.max_bytes.or(self.max_bytes),
            output: other.output.clone().or_else(|| self.output.clone()),
        }
    }
}

/// Editor behavior resolved from flags and defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorOptions {
    pub auto_save: bool,
    pub debounce_ms: u64,
    pub long_press_ms: u64,
    pub max_bytes: usize,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            auto_save: true,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            long_press_ms: DEFAULT_LONG_PRESS_MS,
            max_bytes: MAX_CONTENT_BYTES,
        }
    }
}

impl EditorOptions {
    pub fn from_flags(flags: &ConfigFlags) -> Self {
        let defaults = Self::default();
        Self {
            auto_save: !flags.no_auto_save,
            debounce_ms: flags.debounce_ms.unwrap_or(defaults.debounce_ms),
            long_press_ms: flags.long_press_ms.unwrap_or(defaults.long_press_ms),
            max_bytes: flags.max_bytes.unwrap_or(defaults.max_bytes),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("markwright").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("markwright")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("markwright").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("markwright")
                .join("config");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".markwrightrc")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# markwright defaults (saved with --save)".to_string());
    if flags.no_auto_save {
        lines.push("--no-auto-save".to_string());
    }
    if let Some(ms) = flags.debounce_ms {
        lines.push(format!("--debounce-ms {ms}"));
    }
    if let Some(ms) = flags.long_press_ms {
        lines.push(format!("--long-press-ms {ms}"));
    }
    if let Some(bytes) = flags.max_bytes {
        lines.push(format!("--max-bytes {bytes}"));
    }
    if let Some(path) = &flags.output {
        lines.push(format!("--output {}", path.display()));
    }
    if flags.perf {
        lines.push("--perf".to_string());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (name, inline) = match token.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (token, None),
        };
        match name {
            "--no-auto-save" => flags.no_auto_save = true,
            "--perf" => flags.perf = true,
            "--debounce-ms" | "--long-press-ms" | "--max-bytes" | "--output" => {
                let value = match inline {
                    Some(value) => Some(value),
                    None => {
                        let next = tokens.get(i + 1).map(String::as_str);
                        if next.is_some() {
                            i += 1;
                        }
                        next
                    }
                };
                if let Some(value) = value {
                    apply_valued(&mut flags, name, value);
                }
            }
            _ => {}
        }
        i += 1;
    }
    flags
}

fn apply_valued(flags: &mut ConfigFlags, name: &str, value: &str) {
    match name {
        "--debounce-ms" => flags.debounce_ms = value.parse().ok(),
        "--long-press-ms" => flags.long_press_ms = value.parse().ok(),
        "--max-bytes" => flags.max_bytes = value.parse().ok(),
        "--output" => flags.output = Some(PathBuf::from(value)),
        _ => {}
    }
}
