use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Graphviz DOT
    #[default]
    Dot,
    /// The graph model as JSON
    Json,
    /// One block of rows per descriptor
    Text,
}

/// Settings read from `config.json` in the user's config directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// usb.ids file, or its JSON rendition, used for vendor and product names.
    pub usb_ids: Option<PathBuf>,
    pub format: Format,
    pub layout_edges: bool,
    pub show_default_flags: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            usb_ids: None,
            format: Format::Dot,
            layout_edges: true,
            show_default_flags: false,
        }
    }
}

impl Config {
    pub fn dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("descviz"))
    }

    /// Loads the config from the default location. A missing file gives the defaults; so does
    /// one that does not parse, after a warning.
    pub fn load() -> Self {
        match Self::dir() {
            Some(dir) => Self::load_from(&dir.join("config.json")),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        let mut serialized = String::new();
        match File::open(path) {
            Ok(mut file) => {
                if let Err(e) = file.read_to_string(&mut serialized) {
                    warn!("Failed to read config from {}: {}", path.display(), e);
                    return Self::default();
                }
            }
            Err(_) => {
                debug!("No config at {}", path.display());
                return Self::default();
            }
        }
        match serde_json::from_str(&serialized) {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to parse config from {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
