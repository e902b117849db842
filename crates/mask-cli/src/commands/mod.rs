//! CLI command implementations

pub mod config;
pub mod mix;
pub mod split;

use anyhow::{Context, Result};
use mask_io::{FileLoader, StreamingLoader};
use mask_ops::{CreationMethod, MaskTools, MaskToolsConfig};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Options shared by every command.
pub struct Globals {
    pub config: MaskToolsConfig,
    pub root: PathBuf,
}

impl Globals {
    /// Loads the config file (if any) and applies `--backend`.
    pub fn new(config_path: Option<&Path>, backend: Option<CreationMethod>, root: PathBuf) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => MaskToolsConfig::from_file(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?,
            None => MaskToolsConfig::default(),
        };
        if let Some(method) = backend {
            config.mixer.creation_method = method;
            config.splitter.creation_method = method;
        }
        debug!(
            "mix via {}, split via {}, root {}",
            config.mixer.creation_method,
            config.splitter.creation_method,
            root.display()
        );
        Ok(Self { config, root })
    }

    /// Engine reading files under the root, decoding sources in the background.
    pub fn tools(&self) -> MaskTools<StreamingLoader<FileLoader>> {
        let loader = StreamingLoader::new(FileLoader::new(&self.root));
        MaskTools::from_config(loader, &self.config)
    }
}
