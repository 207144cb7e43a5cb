use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const API_KEY_VAR: &str = "GRSAI_API_KEY";
pub const HOST_VAR: &str = "GRSAI_HOST";
pub const MODEL_VAR: &str = "GRSAI_MODEL";

pub const DEFAULT_HOST: &str = "https://grsai.dakka.com.cn";
pub const DEFAULT_MODEL: &str = "nano-banana-pro";
pub const DRAW_PATH: &str = "/v1/draw/nano-banana";

const ENV_FILE: &str = ".env";
const REPO_ROOT_MARKER: &str = ".git";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not set; add `{var}=your-api-key` to a .env file or export it")]
    MissingCredential { var: String },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
}

/// One place configuration values can come from.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// Parsed `.env` file. The process environment is left untouched.
    EnvFile {
        path: PathBuf,
        vars: HashMap<String, String>,
    },
    Process,
}

impl ConfigSource {
    pub fn env_file(path: &Path) -> Result<Self, ConfigError> {
        let read_err = |source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        };
        let vars = dotenvy::from_path_iter(path)
            .map_err(read_err)?
            .collect::<Result<HashMap<_, _>, _>>()
            .map_err(read_err)?;
        Ok(ConfigSource::EnvFile {
            path: path.to_path_buf(),
            vars,
        })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match self {
            ConfigSource::EnvFile { vars, .. } => vars.get(key).cloned(),
            ConfigSource::Process => std::env::var(key).ok(),
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::EnvFile { path, .. } => write!(f, "{}", path.display()),
            ConfigSource::Process => f.write_str("process environment"),
        }
    }
}

/// Ordered configuration sources; the first one holding a non-empty value wins.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    sources: Vec<ConfigSource>,
}

impl ConfigSources {
    pub fn new(sources: Vec<ConfigSource>) -> Self {
        Self { sources }
    }

    /// Walk the standard `.env` locations, falling back to the process
    /// environment. See [`env_file_candidates`] for the order.
    pub fn discover(program_dir: Option<&Path>, cwd: &Path) -> Self {
        let home = dirs::home_dir();
        Self::from_candidates(&env_file_candidates(program_dir, cwd, home.as_deref()))
    }

    /// Load every existing candidate file in order, then the process environment.
    pub fn from_candidates(candidates: &[PathBuf]) -> Self {
        let mut sources = Vec::new();
        for path in candidates {
            if !path.is_file() {
                continue;
            }
            match ConfigSource::env_file(path) {
                Ok(source) => {
                    tracing::info!("Loaded environment file: {}", path.display());
                    sources.push(source);
                }
                Err(e) => tracing::warn!("Skipping unreadable environment file: {e}"),
            }
        }
        if sources.is_empty() {
            tracing::warn!("No .env file found, using process environment only");
        }
        sources.push(ConfigSource::Process);
        Self { sources }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.sources
            .iter()
            .find_map(|source| source.get(key).filter(|v| !v.trim().is_empty()))
    }
}

/// Directory holding the running executable.
pub fn program_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()?
        .parent()
        .map(Path::to_path_buf)
}

/// `.env` paths in lookup order: the program directory and its ancestors up
/// to the first directory holding a `.git` marker, then the same walk from
/// `cwd`, then the user-level skill directory.
pub fn env_file_candidates(
    program_dir: Option<&Path>,
    cwd: &Path,
    home: Option<&Path>,
) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    for start in program_dir.into_iter().chain(Some(cwd)) {
        for dir in start.ancestors() {
            let path = dir.join(ENV_FILE);
            if !candidates.contains(&path) {
                candidates.push(path);
            }
            if dir.join(REPO_ROOT_MARKER).exists() {
                break;
            }
        }
    }
    if let Some(home) = home {
        candidates.push(skill_env_path(home));
    }
    candidates
}

pub fn skill_env_path(home: &Path) -> PathBuf {
    home.join(".claude")
        .join("skills")
        .join("ppt-generator")
        .join(ENV_FILE)
}

/// Connection settings for the image generation service
#[derive(Clone)]
pub struct GenerationSettings {
    pub api_key: String,
    pub host: String,
    pub model: String,
}

impl GenerationSettings {
    pub fn from_sources(sources: &ConfigSources) -> Result<Self, ConfigError> {
        let api_key = sources
            .get(API_KEY_VAR)
            .ok_or_else(|| ConfigError::MissingCredential {
                var: API_KEY_VAR.to_string(),
            })?;
        Ok(Self {
            api_key,
            host: sources
                .get(HOST_VAR)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            model: sources
                .get(MODEL_VAR)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}{DRAW_PATH}", self.host.trim_end_matches('/'))
    }
}

impl fmt::Debug for GenerationSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationSettings")
            .field("api_key", &"<redacted>")
            .field("host", &self.host)
            .field("model", &self.model)
            .finish()
    }
}
