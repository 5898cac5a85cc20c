use std::env;
use std::fs;
use std::path::Path;

use crate::Result;

/// Default config file names, searched in the working directory.
pub const CONFIG_PATHS: [&str; 2] = ["./flvkit.toml", "./flvkit_config.toml"];

const TEMPLATE: &str = include_str!("../flvkit.template.toml");

/// Switches controlling how much of each tag is decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InspectOptions {
    /// Decode AVC decoder configuration records and AudioSpecificConfig
    pub parse_headers: bool,
    /// Split AVC NALU payloads into NAL units
    pub parse_nal_units: bool,
    /// Keep undecoded payloads as byte ranges rather than hex text
    pub pass_data_buffer: bool,
    /// Attach a byte range to every decoded NAL unit
    pub pass_nal_unit_data: bool,
    /// Run the validation rules after the walk
    pub run_validations: bool,
}

impl InspectOptions {
    /// Everything decoded and validated, payloads kept as byte ranges.
    pub fn full() -> Self {
        Self {
            parse_headers: true,
            parse_nal_units: true,
            pass_data_buffer: true,
            pass_nal_unit_data: true,
            run_validations: true,
        }
    }

    /// The options actually in force: validations need decoded headers and
    /// NAL units, so enabling them switches both on.
    pub fn effective(&self) -> Self {
        let mut options = self.clone();
        if options.run_validations {
            options.parse_headers = true;
            options.parse_nal_units = true;
        }
        options
    }

    /// Defaults, overridden by the first config file found and then by
    /// `FLVKIT_*` environment variables.
    pub fn load() -> Result<Self> {
        let mut options = InspectOptions::default();

        for path in &CONFIG_PATHS {
            if Path::new(path).exists() {
                options.apply_file(path)?;
                break;
            }
        }

        options.apply_env()?;
        Ok(options)
    }

    /// Reads `key = value` lines from a config file, the flat subset of
    /// TOML the template uses. `#` starts a comment anywhere on a line;
    /// unknown keys are ignored.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut options = InspectOptions::default();
        options.apply_file(path)?;
        Ok(options)
    }

    fn apply_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let content = fs::read_to_string(path)?;
        for line in content.lines() {
            let line = line.split_once('#').map_or(line, |(before, _)| before).trim();
            if line.is_empty() {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                let value = value.trim().trim_matches('"').trim_matches('\'');
                self.set(key.trim(), value)?;
            }
        }
        Ok(())
    }

    fn apply_env(&mut self) -> Result<()> {
        let keys = [
            "parse_headers",
            "parse_nal_units",
            "pass_data_buffer",
            "pass_nal_unit_data",
            "run_validations",
        ];
        for key in keys {
            let var = format!("FLVKIT_{}", key.to_uppercase());
            if let Ok(value) = env::var(&var) {
                self.set(key, value.trim())?;
            }
        }
        Ok(())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let slot = match key {
            "parse_headers" => &mut self.parse_headers,
            "parse_nal_units" => &mut self.parse_nal_units,
            "pass_data_buffer" => &mut self.pass_data_buffer,
            "pass_nal_unit_data" => &mut self.pass_nal_unit_data,
            "run_validations" => &mut self.run_validations,
            _ => {
                log::debug!("Ignoring unknown option {}", key);
                return Ok(());
            }
        };
        *slot = value.parse()?;
        Ok(())
    }
}

/// Creates a default config template file if it doesn't exist
pub fn create_default_config_template<P: AsRef<Path>>(path: P) -> std::io::Result<()> {
    if !path.as_ref().exists() {
        fs::write(path, TEMPLATE)?;
    }
    Ok(())
}
