use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Shape of the GDP data source: where the file lives, how it is
/// delimited, and which columns carry the country name and code.
/// `min_year`/`max_year` describe the file's coverage and are
/// informational only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GdpInfo {
    pub gdpfile: PathBuf,
    pub separator: char,
    pub quote: char,
    pub min_year: u32,
    pub max_year: u32,
    pub country_name: String,
    pub country_code: String,
}

/// Shape of the bridging code table: which column holds the plot
/// library's codes and which holds the dataset's codes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeInfo {
    pub codefile: PathBuf,
    pub separator: char,
    pub quote: char,
    pub plot_codes: String,
    pub data_codes: String,
}

/// Top-level YAML config for the CLI harness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub gdp: GdpInfo,
    pub codes: CodeInfo,
    #[serde(default = "default_years")]
    pub years: Vec<String>,
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
}

fn default_years() -> Vec<String> {
    ["1960", "1980", "2000", "2010"]
        .iter()
        .map(|y| y.to_string())
        .collect()
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("maps")
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("opening config file {}", path.display()))?;
        serde_yaml::from_reader(file)
            .with_context(|| format!("parsing config file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_load_config_with_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("worldgdp.yaml");
        let mut file = File::create(&path)?;
        writeln!(
            file,
            r#"
gdp:
  gdpfile: data/isp_gdp.csv
  separator: ","
  quote: "\""
  min_year: 1960
  max_year: 2015
  country_name: Country Name
  country_code: Country Code
codes:
  codefile: data/isp_country_codes.csv
  separator: ","
  quote: "\""
  plot_codes: ISO3166-1-Alpha-2
  data_codes: ISO3166-1-Alpha-3
"#
        )?;

        let config = Config::load(&path)?;
        assert_eq!(config.gdp.separator, ',');
        assert_eq!(config.codes.plot_codes, "ISO3166-1-Alpha-2");
        assert_eq!(config.years, vec!["1960", "1980", "2000", "2010"]);
        assert_eq!(config.out_dir, PathBuf::from("maps"));
        Ok(())
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = Config::load(Path::new("does/not/exist.yaml")).unwrap_err();
        assert!(err.to_string().contains("opening config file"));
    }
}
