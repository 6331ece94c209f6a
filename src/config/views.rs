//! View template configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Directory holding `index.html` and `404.html`; built-in templates when unset
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}
