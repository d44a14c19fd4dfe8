use super::{reduce::ReduceSettings, scheduler::SchedulerConfig};
use crate::MergeStrategy;
use std::{path::Path, sync::Arc};

/// Static mutex holding the global configuration, initialized as `None`.
static NDACCUM_GLOBAL_CONFIG: spin::Mutex<Option<Arc<GlobalConfig>>> = spin::Mutex::new(None);

/// Errors raised while reading a configuration file.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The file couldn't be read.
    #[error("Unable to read the configuration file: {0}")]
    Io(#[from] std::io::Error),
    /// The file isn't valid TOML for [`GlobalConfig`].
    #[error("The configuration file doesn't have the right format: {0}")]
    Format(#[from] toml::de::Error),
}

/// Process-wide configuration of the scheduler and of the reductions.
#[derive(Default, Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct GlobalConfig {
    /// Configuration of the partition scheduler.
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Defaults applied to reductions.
    #[serde(default)]
    pub reduce: ReduceSettings,
}

impl GlobalConfig {
    /// Retrieves the current global configuration, loading it if not set.
    ///
    /// The first call looks for `ndaccum.toml` or `NdAccum.toml` in the current directory
    /// or its parents, falls back to the default configuration, then applies the
    /// environment overrides (see [`GlobalConfig::override_from_env`]).
    ///
    /// # Notes
    ///
    /// Each call takes a global lock. Hot paths should read what they need once and keep it.
    pub fn get() -> Arc<Self> {
        let mut state = NDACCUM_GLOBAL_CONFIG.lock();
        match state.as_ref() {
            Some(config) => config.clone(),
            None => {
                let config = Arc::new(Self::from_current_dir().override_from_env());
                *state = Some(config.clone());
                config
            }
        }
    }

    /// Sets the global configuration to the provided value.
    ///
    /// # Panics
    /// Panics if the configuration has already been set or read, as it cannot be overridden.
    pub fn set(config: Self) {
        let mut state = NDACCUM_GLOBAL_CONFIG.lock();
        if state.is_some() {
            panic!("Cannot set the global configuration multiple times.");
        }
        *state = Some(Arc::new(config));
    }

    /// Save the current configuration to the provided file path.
    pub fn save_default<P: AsRef<Path>>(path: P) -> std::io::Result<()> {
        let config = Self::get();
        let content = toml::to_string_pretty(config.as_ref()).map_err(std::io::Error::other)?;
        std::fs::write(path, content)
    }

    /// Overrides configuration fields based on environment variables.
    ///
    /// - `NDACCUM_DEBUG_LOG`: `stdout`, `stderr`, `1`/`true` (log to `/tmp/ndaccum.log`),
    ///   `0`/`false` (disable), or a file path.
    /// - `NDACCUM_MAX_WORKERS`: maximum number of worker threads.
    /// - `NDACCUM_MERGE`: `sequential` or `tree`.
    pub fn override_from_env(self) -> Self {
        self.override_from(|key| std::env::var(key).ok())
    }

    fn override_from<F: Fn(&str) -> Option<String>>(mut self, var: F) -> Self {
        use super::{reduce::ReduceLogLevel, scheduler::SchedulerLogLevel};

        if let Some(val) = var("NDACCUM_DEBUG_LOG") {
            self.scheduler.logger.level = SchedulerLogLevel::Full;
            self.reduce.logger.level = ReduceLogLevel::Full;

            match val.as_str() {
                "stdout" => {
                    self.scheduler.logger.stdout = true;
                    self.reduce.logger.stdout = true;
                }
                "stderr" => {
                    self.scheduler.logger.stderr = true;
                    self.reduce.logger.stderr = true;
                }
                "1" | "true" => {
                    let file_path = "/tmp/ndaccum.log";
                    self.scheduler.logger.file = Some(file_path.into());
                    self.reduce.logger.file = Some(file_path.into());
                }
                "0" | "false" => {
                    self.scheduler.logger.level = SchedulerLogLevel::Disabled;
                    self.reduce.logger.level = ReduceLogLevel::Disabled;
                }
                file_path => {
                    self.scheduler.logger.file = Some(file_path.into());
                    self.reduce.logger.file = Some(file_path.into());
                }
            }
        }

        if let Some(val) = var("NDACCUM_MAX_WORKERS") {
            match val.parse::<usize>() {
                Ok(workers) if workers > 0 => self.scheduler.max_workers = Some(workers),
                _ => log::warn!("Ignoring invalid NDACCUM_MAX_WORKERS value `{val}`"),
            }
        }

        if let Some(val) = var("NDACCUM_MERGE") {
            match val.as_str() {
                "sequential" => self.reduce.merge = MergeStrategy::Sequential,
                "tree" => self.reduce.merge = MergeStrategy::Tree,
                _ => log::warn!("Ignoring invalid NDACCUM_MERGE value `{val}`"),
            }
        }

        self
    }

    // Traverses up the directory tree until a configuration file is found or the root is
    // reached. Returns a default configuration if no file is found.
    fn from_current_dir() -> Self {
        let Ok(mut dir) = std::env::current_dir() else {
            return Self::default();
        };

        loop {
            for name in ["ndaccum.toml", "NdAccum.toml"] {
                let path = dir.join(name);
                if !path.is_file() {
                    continue;
                }
                match Self::from_file_path(&path) {
                    Ok(config) => return config,
                    Err(err) => {
                        log::warn!("Ignoring configuration {}: {err}", path.display());
                    }
                }
            }

            if !dir.pop() {
                break;
            }
        }

        Self::default()
    }

    /// Loads a configuration from the given file path.
    pub fn from_file_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{reduce::ReduceLogLevel, scheduler::SchedulerLogLevel};

    fn env<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key: &str| {
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn defaults() {
        let config = GlobalConfig::default();
        assert_eq!(config.scheduler.min_partition_len, 4096);
        assert_eq!(config.scheduler.max_workers, None);
        assert_eq!(config.reduce.merge, MergeStrategy::Tree);
    }

    #[test]
    fn parse_partial_toml() {
        let config: GlobalConfig = toml::from_str(
            r#"
            [scheduler]
            max_workers = 3

            [reduce]
            merge = "sequential"

            [reduce.logger]
            stderr = true
            level = "full"
            "#,
        )
        .unwrap();

        assert_eq!(config.scheduler.max_workers, Some(3));
        assert_eq!(config.scheduler.min_partition_len, 4096);
        assert_eq!(config.reduce.merge, MergeStrategy::Sequential);
        assert!(config.reduce.logger.stderr);
        assert!(config.reduce.logger.append);
        assert!(matches!(config.reduce.logger.level, ReduceLogLevel::Full));
    }

    #[test]
    fn env_overrides() {
        let config = GlobalConfig::default().override_from(env(&[
            ("NDACCUM_DEBUG_LOG", "stderr"),
            ("NDACCUM_MAX_WORKERS", "2"),
            ("NDACCUM_MERGE", "sequential"),
        ]));

        assert!(config.scheduler.logger.stderr);
        assert!(matches!(config.scheduler.logger.level, SchedulerLogLevel::Full));
        assert_eq!(config.scheduler.max_workers, Some(2));
        assert_eq!(config.reduce.merge, MergeStrategy::Sequential);
    }

    #[test]
    fn invalid_env_values_are_ignored() {
        let config = GlobalConfig::default().override_from(env(&[
            ("NDACCUM_MAX_WORKERS", "0"),
            ("NDACCUM_MERGE", "random"),
        ]));

        assert_eq!(config.scheduler.max_workers, None);
        assert_eq!(config.reduce.merge, MergeStrategy::Tree);
    }

    #[test]
    fn debug_log_disabled() {
        let config = GlobalConfig::default().override_from(env(&[("NDACCUM_DEBUG_LOG", "0")]));
        assert!(matches!(config.reduce.logger.level, ReduceLogLevel::Disabled));
    }
}
