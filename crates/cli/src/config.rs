use anyhow::{Context, Result};
use ledgerlens_core::DateRange;
use ledgerlens_export::ExportConfig;
use std::fs;
use std::path::Path;

/// Reads export settings from a TOML file, or defaults when no file is
/// given.
pub fn load_config(path: Option<&Path>) -> Result<ExportConfig> {
    let Some(p) = path else {
        return Ok(ExportConfig::default());
    };
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub ledger_name: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub file_name: Option<String>,
}

impl Overrides {
    pub fn apply(self, mut config: ExportConfig) -> ExportConfig {
        let flags = DateRange::parse_bounds(self.from.as_deref(), self.to.as_deref());
        if let Some(name) = self.ledger_name {
            config.ledger_name = name;
        }
        if self.from.is_some() {
            config.range.from = flags.from;
        }
        if self.to.is_some() {
            config.range.to = flags.to;
        }
        if let Some(file_name) = self.file_name {
            config.file_name = file_name;
        }
        config
    }
}
