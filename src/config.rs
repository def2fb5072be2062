use crate::interface::InterfaceOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Ingest workers; unset means one per available core
    pub threads: Option<usize>,
    /// Show members inherited through private bases
    pub private_bases: bool,
    /// Group same-name callables when listing members
    pub overloads: bool,
    /// Input globs used when none are given on the command line
    pub input: Vec<String>,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            threads: None,
            private_bases: true,
            overloads: true,
            input: Vec::new(),
        }
    }
}

impl CorpusConfig {
    pub fn interface_options(&self) -> InterfaceOptions {
        InterfaceOptions {
            private_bases: self.private_bases,
        }
    }

    pub fn worker_threads(&self) -> usize {
        self.threads.filter(|n| *n > 0).unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("symcorpus.toml")
}

/// Load the config file, or defaults when it does not exist
pub fn load_config(path: Option<&Path>) -> anyhow::Result<CorpusConfig> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(CorpusConfig::default());
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: CorpusConfig = toml::from_str(&contents)?;
    Ok(config)
}

pub fn write_config(path: &Path, config: &CorpusConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(Some(&dir.path().join("absent.toml"))).unwrap();
        assert!(config.private_bases);
        assert!(config.overloads);
        assert!(config.input.is_empty());
        assert!(config.worker_threads() >= 1);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("symcorpus.toml");
        std::fs::write(&path, "private_bases = false\ninput = [\"out/*.json\"]\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert!(!config.private_bases);
        assert!(config.overloads);
        assert_eq!(config.input, vec!["out/*.json"]);
        assert!(!config.interface_options().private_bases);
    }

    #[test]
    fn test_write_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("symcorpus.toml");
        let config = CorpusConfig {
            threads: Some(2),
            ..CorpusConfig::default()
        };

        write_config(&path, &config, false).unwrap();
        assert!(write_config(&path, &config, false).is_err());
        write_config(&path, &config, true).unwrap();

        let loaded = load_config(Some(&path)).unwrap();
        assert_eq!(loaded.threads, Some(2));
        assert_eq!(loaded.worker_threads(), 2);
    }
}
