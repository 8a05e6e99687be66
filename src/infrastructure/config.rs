use anyhow::{Context, Result};
use log::{LevelFilter, info};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_COMMAND_FILE: &str = "req.curl";

/// Runtime settings resolved from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub command_path: PathBuf,
    pub color: bool,
    pub log_level: LevelFilter,
}

impl Config {
    pub fn new(command_path: impl Into<PathBuf>, color: bool, verbose: bool) -> Self {
        Self {
            command_path: command_path.into(),
            color,
            log_level: if verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Warn
            },
        }
    }

    /// Reads the saved curl command
    pub fn load_command(&self) -> Result<String> {
        read_command_file(&self.command_path)
    }
}

fn read_command_file(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read command file {}", path.display()))?;
    info!("loaded {} ({} bytes)", path.display(), text.len());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("requester-{}-{}", std::process::id(), name))
    }

    #[test]
    fn verbose_raises_log_level() {
        assert_eq!(Config::new("a.curl", true, true).log_level, LevelFilter::Debug);
        assert_eq!(
            Config::new(DEFAULT_COMMAND_FILE, true, false).log_level,
            LevelFilter::Warn
        );
    }

    #[test]
    fn loads_command_text() {
        let path = temp_path("ok.curl");
        fs::write(&path, "curl https://example.com\n").unwrap();

        let text = Config::new(&path, false, false).load_command().unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(text, "curl https://example.com\n");
    }

    #[test]
    fn missing_file_names_the_path() {
        let path = temp_path("missing.curl");
        let err = Config::new(&path, false, false).load_command().unwrap_err();
        assert!(err.to_string().contains("missing.curl"));
        assert!(err.downcast_ref::<std::io::Error>().is_some());
    }

    #[test]
    fn rejects_non_utf8_files() {
        let path = temp_path("binary.curl");
        fs::write(&path, [0x63, 0x75, 0xff, 0xfe]).unwrap();

        let result = Config::new(&path, false, false).load_command();
        fs::remove_file(&path).unwrap();
        assert!(result.is_err());
    }
}
