use crate::attachment::AttachmentConfig;
use crate::emitter::EmitterConfig;
use crate::script::ResponseTable;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub title: String,
    /// JSON array of replies; the built-in script is used when unset.
    pub script_path: Option<PathBuf>,
    /// Show the first reply as soon as a session starts.
    pub greeting: bool,
    pub chunk_size: NonZeroUsize,
    pub chunk_delay_ms: u64,
    pub thinking_from_step: usize,
    pub thinking_delay_ms: u64,
    pub attachment_step: Option<usize>,
    pub attachment: AttachmentConfig,
    pub download_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "🦙💬 Llama 2 Chatbot".to_string(),
            script_path: None,
            greeting: true,
            chunk_size: NonZeroUsize::new(5).unwrap_or(NonZeroUsize::MIN),
            chunk_delay_ms: 50,
            thinking_from_step: 7,
            thinking_delay_ms: 3000,
            attachment_step: Some(7),
            attachment: AttachmentConfig::default(),
            download_dir: None,
        }
    }
}

impl Config {
    pub fn emitter_config(&self) -> EmitterConfig {
        EmitterConfig {
            chunk_size: self.chunk_size,
            thinking_from: self.thinking_from_step,
            thinking_delay: Duration::from_millis(self.thinking_delay_ms),
            attachment_step: self.attachment_step,
            attachment: self.attachment.clone(),
        }
    }

    pub fn chunk_delay(&self) -> Duration {
        Duration::from_millis(self.chunk_delay_ms)
    }

    pub fn load_script(&self) -> Result<ResponseTable> {
        match &self.script_path {
            Some(path) => ResponseTable::from_file(path),
            None => Ok(ResponseTable::builtin()),
        }
    }

    /// Where saved attachments go: the configured directory, else the user's
    /// download folder, else the app directory.
    pub fn download_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.download_dir {
            return Ok(dir.clone());
        }
        match dirs::download_dir() {
            Some(dir) => Ok(dir),
            None => app_dir(),
        }
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        if let Some(path) = self.script_path.as_mut() {
            resolve(path);
        }
        if let Some(path) = self.download_dir.as_mut() {
            resolve(path);
        }
        resolve(&mut self.attachment.image_path);
        resolve(&mut self.attachment.download_path);
    }
}

pub fn app_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;
    let dir = home.join(".scripted-chat");
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

pub fn load_config() -> Result<Config> {
    load_config_from(&app_dir()?.join("config.json"))
}

/// Read the config at `path`, writing the defaults there first if it does not
/// exist. Relative paths inside resolve against the config's directory.
pub fn load_config_from(path: &Path) -> Result<Config> {
    let mut config = if path.exists() {
        let bytes = std::fs::read(path)?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("Invalid config file {}", path.display()))?
    } else {
        let default = Config::default();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(&default)?;
        std::fs::write(path, json)?;
        default
    };

    if let Some(base) = path.parent() {
        config.resolve_paths(base);
    }
    Ok(config)
}
