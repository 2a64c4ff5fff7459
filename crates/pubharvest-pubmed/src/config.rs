//! Extraction run configuration

use std::path::PathBuf;

/// Runtime configuration for an extraction run
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding `*.xml` / `*.xml.gz` exports
    pub input_dir: PathBuf,
    /// Maximum files to process (for testing)
    pub max_files: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("data/raw"),
            max_files: None,
        }
    }
}
