//! Configuration management for CLI tools.
//!
//! Configuration is stored in ~/.narrasync/{app_name}/config.yaml as a set of
//! named contexts, one of which may be current.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default base configuration directory name.
pub const DEFAULT_BASE_DIR: &str = ".narrasync";
/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Environment variable holding a subscription key.
pub const ENV_API_KEY: &str = "AZURE_SPEECH_KEY";
/// Environment variable holding the service region.
pub const ENV_REGION: &str = "AZURE_SPEECH_REGION";

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Name of the currently active context.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub current_context: String,

    /// Map of context name to context configuration.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub contexts: HashMap<String, Context>,

    /// Path to the config file (not serialized).
    #[serde(skip)]
    config_path: PathBuf,
}

/// A single provider context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    /// Context name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Subscription key.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_key: String,

    /// Service region, e.g. `koreacentral`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub region: String,

    /// Endpoint override (optional, derived from the region if empty).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub base_url: String,

    /// Request timeout in seconds (optional).
    #[serde(default, skip_serializing_if = "is_zero")]
    pub timeout: u32,

    /// Maximum number of retries (optional).
    #[serde(default, skip_serializing_if = "is_zero")]
    pub max_retries: u32,

    /// Default narration voice (optional).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default_voice: String,

    /// Application-specific settings.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, String>,
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

impl Config {
    /// Gets the default config directory.
    pub fn default_config_dir(app_name: &str) -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(DEFAULT_BASE_DIR).join(app_name))
    }

    /// Gets the default config file path.
    pub fn default_config_path(app_name: &str) -> Option<PathBuf> {
        Self::default_config_dir(app_name).map(|dir| dir.join(DEFAULT_CONFIG_FILE))
    }

    /// Returns the config file path.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Saves the configuration to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        write_yaml(&self.config_path, self)
    }

    /// Adds or replaces a context.
    pub fn add_context(&mut self, name: &str, mut ctx: Context) -> anyhow::Result<()> {
        if name.trim().is_empty() {
            anyhow::bail!("context name must be non-empty");
        }
        ctx.name = name.to_string();
        self.contexts.insert(name.to_string(), ctx);
        self.save()
    }

    /// Deletes a context.
    pub fn delete_context(&mut self, name: &str) -> anyhow::Result<()> {
        if self.contexts.remove(name).is_none() {
            anyhow::bail!("context '{}' not found", name);
        }
        if self.current_context == name {
            self.current_context.clear();
        }
        self.save()
    }

    /// Sets the current context.
    pub fn use_context(&mut self, name: &str) -> anyhow::Result<()> {
        if !self.contexts.contains_key(name) {
            anyhow::bail!("context '{}' not found", name);
        }
        self.current_context = name.to_string();
        self.save()
    }

    /// Gets a specific context.
    pub fn get_context(&self, name: &str) -> Option<&Context> {
        self.contexts.get(name)
    }

    /// Gets the current context.
    pub fn get_current_context(&self) -> Option<&Context> {
        if self.current_context.is_empty() {
            return None;
        }
        self.contexts.get(&self.current_context)
    }

    /// Resolves the context by name, or current context if name is empty.
    pub fn resolve_context(&self, name: Option<&str>) -> Option<&Context> {
        match name {
            Some(n) if !n.is_empty() => self.get_context(n),
            _ => self.get_current_context(),
        }
    }

    /// Lists all context names in sorted order.
    pub fn list_contexts(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.contexts.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Context {
    /// Builds a context from `AZURE_SPEECH_KEY` and `AZURE_SPEECH_REGION`.
    ///
    /// Returns `None` when no key is set.
    pub fn from_env() -> Option<Context> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Context> {
        let api_key = lookup(ENV_API_KEY).filter(|k| !k.trim().is_empty())?;
        Some(Context {
            name: "env".to_string(),
            api_key,
            region: lookup(ENV_REGION).unwrap_or_default(),
            ..Default::default()
        })
    }

    /// Gets an extra value.
    pub fn get_extra(&self, key: &str) -> Option<&str> {
        self.extra.get(key).map(|s| s.as_str())
    }

    /// Sets an extra value.
    pub fn set_extra(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.extra.insert(key.into(), value.into());
    }
}

fn resolve_path(app_name: &str, custom_path: Option<&str>) -> anyhow::Result<PathBuf> {
    match custom_path {
        Some(p) => Ok(PathBuf::from(p)),
        None => Config::default_config_path(app_name)
            .ok_or_else(|| anyhow::anyhow!("cannot determine config path")),
    }
}

fn write_yaml(path: &Path, config: &Config) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_yaml::to_string(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Loads configuration for the specified app.
///
/// A missing file yields an empty configuration; nothing is written until the
/// configuration is saved.
pub fn load_config(app_name: &str, custom_path: Option<&str>) -> anyhow::Result<Config> {
    let config_path = resolve_path(app_name, custom_path)?;

    let mut cfg: Config = match std::fs::read_to_string(&config_path) {
        Ok(content) if content.trim().is_empty() => Config::default(),
        Ok(content) => serde_yaml::from_str(&content).map_err(|e| {
            anyhow::anyhow!("failed to parse config {}: {}", config_path.display(), e)
        })?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Config::default(),
        Err(e) => return Err(e.into()),
    };

    for (name, ctx) in cfg.contexts.iter_mut() {
        if ctx.name.is_empty() {
            ctx.name = name.clone();
        }
    }

    cfg.config_path = config_path;

    Ok(cfg)
}

/// Masks the API key for display.
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}{}{}", head, "*".repeat(chars.len() - 8), tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config() -> (tempfile::TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        (dir, path.to_string_lossy().to_string())
    }

    #[test]
    fn test_load_missing_is_empty() {
        let (_dir, path) = temp_config();
        let cfg = load_config("narrasync", Some(&path)).unwrap();
        assert!(cfg.contexts.is_empty());
        assert!(cfg.current_context.is_empty());
        assert_eq!(cfg.path(), Path::new(&path));
        assert!(!Path::new(&path).exists());
    }

    #[test]
    fn test_context_lifecycle() {
        let (_dir, path) = temp_config();
        let mut cfg = load_config("narrasync", Some(&path)).unwrap();

        let ctx = Context {
            api_key: "0123456789abcdef".to_string(),
            region: "koreacentral".to_string(),
            default_voice: "ko-KR-InJoonNeural".to_string(),
            ..Default::default()
        };
        cfg.add_context("work", ctx).unwrap();
        cfg.add_context("home", Context::default()).unwrap();
        cfg.use_context("work").unwrap();

        let reloaded = load_config("narrasync", Some(&path)).unwrap();
        assert_eq!(reloaded.list_contexts(), vec!["home", "work"]);
        let current = reloaded.get_current_context().unwrap();
        assert_eq!(current.name, "work");
        assert_eq!(current.region, "koreacentral");
        assert_eq!(current.default_voice, "ko-KR-InJoonNeural");
        assert_eq!(reloaded.resolve_context(Some("home")).unwrap().name, "home");
        assert_eq!(reloaded.resolve_context(Some("")).unwrap().name, "work");
        assert!(reloaded.resolve_context(Some("missing")).is_none());

        cfg.delete_context("work").unwrap();
        assert!(cfg.current_context.is_empty());
        assert!(cfg.get_current_context().is_none());
        assert!(cfg.delete_context("work").is_err());
        assert!(cfg.use_context("work").is_err());
    }

    #[test]
    fn test_add_context_rejects_empty_name() {
        let (_dir, path) = temp_config();
        let mut cfg = load_config("narrasync", Some(&path)).unwrap();
        assert!(cfg.add_context(" ", Context::default()).is_err());
    }

    #[test]
    fn test_parse_yaml() {
        let (_dir, path) = temp_config();
        std::fs::create_dir_all(Path::new(&path).parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            "current_context: prod\ncontexts:\n  prod:\n    api_key: secret-key-value\n    region: eastus\n    timeout: 30\n    max_retries: 5\n",
        )
        .unwrap();

        let cfg = load_config("narrasync", Some(&path)).unwrap();
        let ctx = cfg.get_current_context().unwrap();
        assert_eq!(ctx.name, "prod");
        assert_eq!(ctx.timeout, 30);
        assert_eq!(ctx.max_retries, 5);
        assert!(ctx.base_url.is_empty());
    }

    #[test]
    fn test_parse_error_is_reported() {
        let (_dir, path) = temp_config();
        std::fs::create_dir_all(Path::new(&path).parent().unwrap()).unwrap();
        std::fs::write(&path, "contexts: [not, a, map]\n").unwrap();
        let err = load_config("narrasync", Some(&path)).unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }

    #[test]
    fn test_context_from_env() {
        let ctx = Context::from_lookup(|key| match key {
            ENV_API_KEY => Some("abc".to_string()),
            ENV_REGION => Some("westeurope".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(ctx.api_key, "abc");
        assert_eq!(ctx.region, "westeurope");

        assert!(Context::from_lookup(|_| None).is_none());
        assert!(Context::from_lookup(|_| Some(" ".to_string())).is_none());
    }

    #[test]
    fn test_extra() {
        let mut ctx = Context::default();
        ctx.set_extra("output_format", "audio-48khz-192kbitrate-mono-mp3");
        assert_eq!(
            ctx.get_extra("output_format"),
            Some("audio-48khz-192kbitrate-mono-mp3")
        );
        assert_eq!(ctx.get_extra("missing"), None);
    }

    #[test]
    fn test_mask_api_key() {
        assert_eq!(mask_api_key("short"), "*****");
        assert_eq!(mask_api_key("0123456789abcdef"), "0123********cdef");
        assert_eq!(mask_api_key(""), "");
    }
}
