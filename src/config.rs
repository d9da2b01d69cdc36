//! Layered environment files for deployment scripts.
//!
//! Scripts read their settings (RPC endpoints, keys, contract addresses)
//! from the process environment, seeded from two dotenv files under a
//! project root:
//!
//! 1. `<root>/.env`, shared by every chain;
//! 2. `<root>/env/<chain>.env`, where `<chain>` comes from the `CHAIN`
//!    variable, taken from the process environment if it was already set
//!    and otherwise from `.env`.
//!
//! Variables already present in the environment are never overridden, so
//! a value exported in the shell beats `.env`, which beats the chain file.
//! Missing files are skipped.
//!
//! # Example
//!
//! ```rust,no_run
//! use tidewait::config::EnvLoader;
//!
//! let loaded = EnvLoader::from_current_dir()?.load()?;
//! println!("chain: {:?}, files: {:?}", loaded.chain, loaded.files);
//! # Ok::<(), tidewait::config::ConfigError>(())
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

/// Variable that selects the chain file.
pub const CHAIN_VAR: &str = "CHAIN";

/// Error raised while locating or reading environment files.
#[derive(Debug)]
pub enum ConfigError {
    /// The project root could not be resolved.
    Io {
        /// Path being resolved.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// A dotenv file exists but could not be read or parsed.
    Parse {
        /// File being loaded.
        path: PathBuf,
        /// Underlying dotenv error.
        source: dotenvy::Error,
    },
}

impl ConfigError {
    /// The path involved in the failure.
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. } | Self::Parse { path, .. } => path,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot resolve {}: {}", path.display(), source)
            }
            Self::Parse { path, source } => {
                write!(f, "cannot load {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

/// What [`EnvLoader::load`] did.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadedEnv {
    /// The selected chain, if any.
    pub chain: Option<String>,
    /// Files that existed and were loaded, in load order.
    pub files: Vec<PathBuf>,
}

/// Loads `.env` and the per-chain env file from a project root.
#[derive(Debug, Clone)]
pub struct EnvLoader {
    root: PathBuf,
    chain_var: String,
}

impl EnvLoader {
    /// Loader rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            chain_var: CHAIN_VAR.to_string(),
        }
    }

    /// Loader rooted at the canonicalised working directory.
    pub fn from_current_dir() -> Result<Self, ConfigError> {
        let cwd = PathBuf::from(".");
        let root = std::fs::canonicalize(&cwd).map_err(|source| ConfigError::Io {
            path: cwd,
            source,
        })?;
        Ok(Self::new(root))
    }

    /// Read the chain name from `name` instead of `CHAIN`.
    pub fn with_chain_var(mut self, name: impl Into<String>) -> Self {
        self.chain_var = name.into();
        self
    }

    /// The project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the shared env file.
    pub fn shared_file(&self) -> PathBuf {
        self.root.join(".env")
    }

    /// Path of the env file for `chain`.
    pub fn chain_file(&self, chain: &str) -> PathBuf {
        self.root.join("env").join(format!("{}.env", chain))
    }

    /// Load the shared file, then the chain file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if an existing file is malformed.
    pub fn load(&self) -> Result<LoadedEnv, ConfigError> {
        let preset_chain = non_empty_var(&self.chain_var);
        let mut loaded = LoadedEnv::default();

        load_if_present(&self.shared_file(), &mut loaded.files)?;

        loaded.chain = preset_chain.or_else(|| non_empty_var(&self.chain_var));
        match &loaded.chain {
            Some(chain) => {
                load_if_present(&self.chain_file(chain), &mut loaded.files)?;
            }
            None => tracing::debug!(var = %self.chain_var, "no chain selected"),
        }

        Ok(loaded)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn load_if_present(path: &Path, files: &mut Vec<PathBuf>) -> Result<(), ConfigError> {
    if !path.is_file() {
        tracing::debug!(path = %path.display(), "env file not found, skipping");
        return Ok(());
    }

    dotenvy::from_path(path).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "loaded env file");
    files.push(path.to_path_buf());
    Ok(())
}
