// Server configuration
//
// Loaded once at startup from environment variables (optionally seeded from a
// `.env` file). SMTP settings are read separately by nema-notify.

use std::env;
use std::path::{Path, PathBuf};

const DEFAULT_FASTSCHEMA_URL: &str = "http://localhost:8000";
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SCHEMA_PATH: &str = "/app/schema/eat.json";
const DEFAULT_TEMPLATE_DIR: &str = "/app/templates";

/// Configuration for the portal server
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the FastSchema sidecar
    pub fastschema_url: String,

    /// Admin credentials; login is attempted only when both are set
    pub admin_user: Option<String>,
    pub admin_pass: Option<String>,

    /// Content type definition registered at startup
    pub schema_path: PathBuf,

    /// Directory holding base.html and the page templates
    pub template_dir: PathBuf,

    pub listen_addr: String,
}

impl AppConfig {
    /// Create configuration from environment variables
    ///
    /// Environment variables:
    /// - `FASTSCHEMA_URL`: content store base URL (default: http://localhost:8000)
    /// - `FS_ADMIN_USER` / `FS_ADMIN_PASS`: content store admin credentials
    /// - `SCHEMA_PATH`: schema file (default: /app/schema/eat.json, else the repository copy)
    /// - `TEMPLATE_DIR`: template directory (default: /app/templates, else the crate copy)
    /// - `LISTEN_ADDR`: bind address (default: 0.0.0.0:8080)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] with an arbitrary variable source.
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let schema_path = get("SCHEMA_PATH").map(PathBuf::from).unwrap_or_else(|| {
            first_existing(
                DEFAULT_SCHEMA_PATH,
                concat!(env!("CARGO_MANIFEST_DIR"), "/../../schema/eat.json"),
            )
        });

        let template_dir = get("TEMPLATE_DIR").map(PathBuf::from).unwrap_or_else(|| {
            first_existing(
                DEFAULT_TEMPLATE_DIR,
                concat!(env!("CARGO_MANIFEST_DIR"), "/templates"),
            )
        });

        Self {
            fastschema_url: get("FASTSCHEMA_URL")
                .unwrap_or_else(|| DEFAULT_FASTSCHEMA_URL.to_string()),
            admin_user: get("FS_ADMIN_USER"),
            admin_pass: get("FS_ADMIN_PASS"),
            schema_path,
            template_dir,
            listen_addr: get("LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string()),
        }
    }

    /// Admin credentials when both user and password are configured
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.admin_user, &self.admin_pass) {
            (Some(user), Some(pass)) => Some((user.as_str(), pass.as_str())),
            _ => None,
        }
    }
}

// Deployment path when it exists, otherwise the path inside the source tree
fn first_existing(deployed: &str, local: &str) -> PathBuf {
    let deployed = Path::new(deployed);
    if deployed.exists() {
        deployed.to_path_buf()
    } else {
        PathBuf::from(local)
    }
}
