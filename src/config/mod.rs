// src/config/mod.rs
//! Configuration loading.
//!
//! Resolution order for the ranker config:
//! 1) `$SMARTBUY_CONFIG_PATH` (must exist if set)
//! 2) `config/ranker.toml`
//! 3) built-in defaults

pub mod ranker;

pub use ranker::{BlendConfig, CategoryWeights, GuardrailConfig, ModeWeights, ModesConfig, RankerConfig};

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::ConfigError;

pub const ENV_CONFIG_PATH: &str = "SMARTBUY_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/ranker.toml";

/// Load a ranker config from an explicit TOML file.
pub fn load_ranker_config_from(path: &Path) -> Result<RankerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    RankerConfig::from_toml_str(&content, &path.display().to_string())
}

/// Load the ranker config using env var + fallbacks (see module docs).
pub fn load_ranker_config() -> Result<RankerConfig, ConfigError> {
    if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if !pb.exists() {
            return Err(ConfigError::MissingEnvPath {
                var: ENV_CONFIG_PATH,
                path: pb,
            });
        }
        let cfg = load_ranker_config_from(&pb)?;
        info!(path = %pb.display(), "ranker config loaded");
        return Ok(cfg);
    }

    let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
    if default_path.exists() {
        let cfg = load_ranker_config_from(&default_path)?;
        info!(path = %default_path.display(), "ranker config loaded");
        return Ok(cfg);
    }

    warn!("no ranker config found; using built-in defaults");
    Ok(RankerConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs};

    #[serial_test::serial]
    #[test]
    fn default_uses_env_then_fallbacks() {
        // Isolate CWD so the repo's own config/ is not picked up.
        let old = env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        env::set_current_dir(tmp.path()).unwrap();
        env::remove_var(ENV_CONFIG_PATH);

        // Nothing on disk → defaults
        let cfg = load_ranker_config().unwrap();
        assert_eq!(cfg, RankerConfig::default());

        // Fallback file in ./config/
        fs::create_dir_all(tmp.path().join("config")).unwrap();
        fs::write(
            tmp.path().join(DEFAULT_CONFIG_PATH),
            "[weights]\nextras = 2.0\n",
        )
        .unwrap();
        assert_eq!(load_ranker_config().unwrap().weights.extras, 2.0);

        // Env wins
        let p_env = tmp.path().join("custom.toml");
        fs::write(&p_env, "clamp_value_norm = false\n").unwrap();
        env::set_var(ENV_CONFIG_PATH, p_env.display().to_string());
        let cfg = load_ranker_config().unwrap();
        assert!(!cfg.clamp_value_norm);
        assert_eq!(cfg.weights.extras, 1.0);

        // Env pointing nowhere is an error, not a silent fallback
        env::set_var(ENV_CONFIG_PATH, tmp.path().join("missing.toml"));
        assert!(matches!(
            load_ranker_config(),
            Err(ConfigError::MissingEnvPath { .. })
        ));
        env::remove_var(ENV_CONFIG_PATH);

        env::set_current_dir(&old).unwrap();
    }
}
