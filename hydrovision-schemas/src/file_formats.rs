use crate::config::SystemConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigFile {
    pub schema_version: String,
    #[serde(default)]
    pub system: SystemConfig,
}
