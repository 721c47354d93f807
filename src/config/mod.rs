//! Generator configuration and its on-disk JSON form.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{TemplateError, TemplateResult};

const TMP_SUFFIX: &str = "tmp";
const CONFIG_DIR_NAME: &str = "finance-template";
const CONFIG_FILE_NAME: &str = "config.json";

/// Settings that shape the emitted workbook. The layout itself is not configurable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output_path: PathBuf,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub currency_symbol: String,
    pub currency_decimals: u8,
    /// Stamped as the document creation date so repeated runs stay byte-identical.
    pub document_date: NaiveDate,
    pub freeze_headers: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("Personal_Finance_Template.xlsx"),
            title: "Personal Finance Template".into(),
            author: None,
            currency_symbol: "₹".into(),
            currency_decimals: 2,
            document_date: Config::default_document_date(),
            freeze_headers: true,
        }
    }
}

impl Config {
    pub fn default_document_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()
    }

    /// Location used when no config path is given explicitly.
    pub fn default_location() -> Option<PathBuf> {
        dirs::config_dir().map(|base| base.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }
}

/// Reads and writes a [`Config`] at a fixed path.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    /// Manager for the platform config directory, when one exists.
    pub fn from_default_location() -> Option<Self> {
        Config::default_location().map(Self::new)
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn exists(&self) -> bool {
        self.config_path.exists()
    }

    /// Loads the config, falling back to defaults when the file does not exist.
    pub fn load(&self) -> TemplateResult<Config> {
        if !self.config_path.exists() {
            return Ok(Config::default());
        }
        self.load_existing()
    }

    /// Loads the config and fails when the file is missing.
    pub fn load_existing(&self) -> TemplateResult<Config> {
        let data = fs::read_to_string(&self.config_path)
            .map_err(|err| TemplateError::io(&self.config_path, err))?;
        serde_json::from_str(&data).map_err(|err| {
            TemplateError::Config(format!("{}: {err}", self.config_path.display()))
        })
    }

    pub fn save(&self, config: &Config) -> TemplateResult<()> {
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| TemplateError::Config(err.to_string()))?;
        let tmp = tmp_path(&self.config_path);
        write_file(&tmp, &json)?;
        fs::rename(&tmp, &self.config_path).map_err(|err| TemplateError::io(&self.config_path, err))
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &str) -> TemplateResult<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| TemplateError::io(parent, err))?;
    }
    let mut file = File::create(path).map_err(|err| TemplateError::io(path, err))?;
    file.write_all(data.as_bytes())
        .and_then(|_| file.flush())
        .map_err(|err| TemplateError::io(path, err))
}
