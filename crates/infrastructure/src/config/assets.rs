//! Static asset configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Static asset configuration
///
/// The asset root holds the built public site at its top level and the CMS
/// admin build under `admin/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetConfig {
    /// Directory containing the built frontend
    #[serde(default = "default_root")]
    pub root: PathBuf,
}

fn default_root() -> PathBuf {
    PathBuf::from("dist/public")
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
        }
    }
}
