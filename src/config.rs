//! Process-wide configuration
//!
//! Built once at startup from the environment (optionally seeded from a local
//! `.env` file) and shared read-only with every request.

use crate::models::KeywordAliases;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com";
pub const DEFAULT_DEEPSEEK_MODEL: &str = "deepseek-chat";
pub const API_KEY_VAR: &str = "DEEPSEEK_API_KEY";
pub const DOTENV_FILE: &str = ".env";

/// Opaque token served verbatim at a fixed path for platform ownership checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationToken {
    pub path: String,
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub deepseek_api_key: Option<String>,
    pub deepseek_base_url: String,
    pub deepseek_model: String,
    pub upstream_timeout: Option<Duration>,
    pub host: String,
    pub port: u16,
    pub static_root: PathBuf,
    pub keyword_aliases: KeywordAliases,
    pub verification_tokens: Vec<VerificationToken>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            deepseek_api_key: None,
            deepseek_base_url: DEFAULT_DEEPSEEK_BASE_URL.to_string(),
            deepseek_model: DEFAULT_DEEPSEEK_MODEL.to_string(),
            upstream_timeout: None,
            host: "0.0.0.0".to_string(),
            port: 80,
            static_root: PathBuf::from("public"),
            keyword_aliases: KeywordAliases::default(),
            verification_tokens: Vec::new(),
        }
    }
}

impl Config {
    /// Load `.env` from the working directory (without overriding variables
    /// that are already set), then read the process environment.
    pub fn from_env() -> Result<Self> {
        load_dotenv(Path::new(DOTENV_FILE));
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();
        let default_aliases = defaults.keyword_aliases.clone();

        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| Error::Configuration(format!("Invalid PORT '{}'", raw)))?,
            None => defaults.port,
        };

        let upstream_timeout = match get("DEEPSEEK_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(raw.parse::<u64>().map_err(|_| {
                Error::Configuration(format!("Invalid DEEPSEEK_TIMEOUT_SECS '{}'", raw))
            })?)),
            None => None,
        };

        let aliases = |key: &str, fallback: Vec<String>| {
            get(key)
                .map(|raw| KeywordAliases::parse_list(&raw))
                .filter(|list| !list.is_empty())
                .unwrap_or(fallback)
        };

        let verification_tokens = match get("SITE_VERIFICATION") {
            Some(raw) => parse_verification_tokens(&raw)?,
            None => Vec::new(),
        };

        Ok(Self {
            deepseek_api_key: get(API_KEY_VAR),
            deepseek_base_url: get("DEEPSEEK_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.deepseek_base_url),
            deepseek_model: get("DEEPSEEK_MODEL").unwrap_or(defaults.deepseek_model),
            upstream_timeout,
            host: get("HOST").unwrap_or(defaults.host),
            port,
            static_root: get("STATIC_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_root),
            keyword_aliases: KeywordAliases {
                keyword1: aliases("KEYWORD1_ALIASES", default_aliases.keyword1),
                keyword2: aliases("KEYWORD2_ALIASES", default_aliases.keyword2),
                horizontal: aliases("HORIZONTAL_ALIASES", default_aliases.horizontal),
            },
            verification_tokens,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.deepseek_api_key.is_some()
    }
}

/// Parse `path=token` pairs separated by commas.
fn parse_verification_tokens(raw: &str) -> Result<Vec<VerificationToken>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (path, token) = entry.split_once('=').ok_or_else(|| {
                Error::Configuration(format!("Invalid SITE_VERIFICATION entry '{}'", entry))
            })?;
            let path = path.trim();
            let path = if path.starts_with('/') {
                path.to_string()
            } else {
                format!("/{}", path)
            };
            Ok(VerificationToken {
                path,
                token: token.trim().to_string(),
            })
        })
        .collect()
}

/// Seed the process environment from exactly `path`.
///
/// Parent directories are never searched. A missing file is not an error;
/// a malformed one is logged and skipped.
pub fn load_dotenv(path: &Path) -> bool {
    match dotenvy::from_path(path) {
        Ok(()) => {
            tracing::debug!("Loaded environment from {}", path.display());
            true
        }
        Err(e) if e.not_found() => false,
        Err(e) => {
            tracing::warn!("Ignoring {}: {}", path.display(), e);
            false
        }
    }
}
