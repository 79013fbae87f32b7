//! Startup configuration from the command line and environment.

use crate::statics;
use crate::table::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};
use std::{ffi::OsString, path::PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}={value:?} is not one of the page sizes {:?}", PAGE_SIZE_OPTIONS)]
    PageSize { var: &'static str, value: String },
    #[error("{var}={value:?} must be `dark` or `light`")]
    Theme { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub page_size: usize,
    pub dark_theme: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(statics::DEFAULT_DATA_FILE),
            page_size: DEFAULT_PAGE_SIZE,
            dark_theme: true,
        }
    }
}

impl AppConfig {
    /// Reads the process arguments and environment. Bad values are logged and
    /// replaced by defaults.
    pub fn from_env() -> Self {
        let arg = std::env::args_os().nth(1);
        Self::resolve(arg, |name| std::env::var_os(name))
    }

    /// Resolution order for the data path: positional argument, then
    /// `NUTRIVIEW_DATA`, then `food_data.json` in the working directory.
    pub fn resolve(arg: Option<OsString>, env: impl Fn(&str) -> Option<OsString>) -> Self {
        let mut config = Self::default();

        if let Some(path) = arg
            .or_else(|| env(statics::ENV_DATA_PATH))
            .filter(|p| !p.is_empty())
        {
            config.data_path = PathBuf::from(path);
        }

        if let Some(raw) = env(statics::ENV_PAGE_SIZE) {
            match parse_page_size(&raw.to_string_lossy()) {
                Ok(size) => config.page_size = size,
                Err(e) => warn!("{e}; using {DEFAULT_PAGE_SIZE}"),
            }
        }

        if let Some(raw) = env(statics::ENV_THEME) {
            match parse_theme(&raw.to_string_lossy()) {
                Ok(dark) => config.dark_theme = dark,
                Err(e) => warn!("{e}; using dark"),
            }
        }

        debug!(?config, "resolved configuration");
        config
    }
}

fn parse_page_size(raw: &str) -> Result<usize, ConfigError> {
    raw.trim()
        .parse::<usize>()
        .ok()
        .filter(|size| PAGE_SIZE_OPTIONS.contains(size))
        .ok_or_else(|| ConfigError::PageSize {
            var: statics::ENV_PAGE_SIZE,
            value: raw.to_string(),
        })
}

fn parse_theme(raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "dark" => Ok(true),
        "light" => Ok(false),
        _ => Err(ConfigError::Theme {
            var: statics::ENV_THEME,
            value: raw.to_string(),
        }),
    }
}
