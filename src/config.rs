use std::env;
use std::path::{Path, PathBuf};

const DEFAULT_DATA_DIR: &str = "data";
const DELIVERIES_FILE: &str = "deliveries.csv";
const MATCHES_FILE: &str = "matches.csv";

/// Where the two source tables live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataConfig {
    pub deliveries: PathBuf,
    pub matches: PathBuf,
}

impl DataConfig {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            deliveries: dir.join(DELIVERIES_FILE),
            matches: dir.join(MATCHES_FILE),
        }
    }

    /// `IPL_DATA_DIR`, then per-file `IPL_DELIVERIES_CSV` / `IPL_MATCHES_CSV`.
    /// Blank values count as unset.
    pub fn from_env() -> Self {
        let dir = env_path("IPL_DATA_DIR").unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let mut cfg = Self::in_dir(dir);
        if let Some(path) = env_path("IPL_DELIVERIES_CSV") {
            cfg.deliveries = path;
        }
        if let Some(path) = env_path("IPL_MATCHES_CSV") {
            cfg.matches = path;
        }
        cfg
    }

    /// Applies `--data-dir`, `--deliveries` and `--matches` from `args`.
    pub fn with_args(mut self, args: &[String]) -> Self {
        if let Some(dir) = flag_value(args, "--data-dir") {
            self = Self::in_dir(dir);
        }
        if let Some(path) = flag_value(args, "--deliveries") {
            self.deliveries = PathBuf::from(path);
        }
        if let Some(path) = flag_value(args, "--matches") {
            self.matches = PathBuf::from(path);
        }
        self
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self::in_dir(DEFAULT_DATA_DIR)
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    let raw = env::var(key).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}

/// Accepts both `--flag=value` and `--flag value`.
pub fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    for (idx, arg) in args.iter().enumerate() {
        if let Some(rest) = arg.strip_prefix(flag)
            && let Some(value) = rest.strip_prefix('=')
        {
            let value = value.trim();
            if !value.is_empty() {
                return Some(value);
            }
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim());
        }
    }
    None
}

pub fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn flags_override_directory() {
        let cfg = DataConfig::default().with_args(&args(&["--data-dir=/tmp/ipl", "--matches", "m.csv"]));
        assert_eq!(cfg.deliveries, PathBuf::from("/tmp/ipl/deliveries.csv"));
        assert_eq!(cfg.matches, PathBuf::from("m.csv"));
    }

    #[test]
    fn flag_value_ignores_blank() {
        let a = args(&["--team=", "--team", "  "]);
        assert_eq!(flag_value(&a, "--team"), None);
        assert!(has_flag(&args(&["--synthetic"]), "--synthetic"));
    }
}
