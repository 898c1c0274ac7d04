//! Share namespace configuration.

use serde::{Deserialize, Serialize};

/// Settings that shape where shared items appear and where real files live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharingConfig {
    /// Folder under each recipient's `files` root that receives new shares.
    #[serde(default = "default_share_folder")]
    pub share_folder: String,
    /// Root directory of the local filesystem provider. Share paths such as
    /// `/alice/files/Docs` are resolved relative to this directory.
    #[serde(default = "default_storage_root")]
    pub storage_root: String,
}

impl Default for SharingConfig {
    fn default() -> Self {
        Self {
            share_folder: default_share_folder(),
            storage_root: default_storage_root(),
        }
    }
}

fn default_share_folder() -> String {
    "Share".to_string()
}

fn default_storage_root() -> String {
    "./data/storage".to_string()
}
