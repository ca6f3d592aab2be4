use std::{num::NonZeroU32, path::Path};

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

/// Longest loan period a configuration may set, in days.
pub const MAX_LOAN_PERIOD_DAYS: u32 = 36_500;

/// Configuration for the library.
///
/// Holds the settings that are not fixed business rules: how long a loan
/// lasts and whether the session starts from the demo catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Versions", into = "Versions")]
pub struct Config {
    /// Number of days from checkout until a book is due back, at most
    /// [`MAX_LOAN_PERIOD_DAYS`].
    loan_period_days: NonZeroU32,

    /// Whether to pre-populate the catalog with demo books and borrowers.
    pub demo_data: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            loan_period_days: default_loan_period_days(),
            demo_data: true,
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, if the TOML content is
    /// invalid, or if the loan period exceeds [`MAX_LOAN_PERIOD_DAYS`].
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the loan period in days.
    #[must_use]
    pub const fn loan_period_days(&self) -> NonZeroU32 {
        self.loan_period_days
    }

    /// Returns the loan period as a duration.
    #[must_use]
    pub fn loan_period(&self) -> TimeDelta {
        TimeDelta::days(i64::from(self.loan_period_days.get()))
    }

    /// Sets the loan period in days.
    ///
    /// # Errors
    ///
    /// Returns an error if `days` exceeds [`MAX_LOAN_PERIOD_DAYS`]. The
    /// current period is kept.
    pub fn set_loan_period_days(&mut self, days: NonZeroU32) -> Result<(), String> {
        self.loan_period_days = checked_loan_period(days)?;
        Ok(())
    }
}

fn checked_loan_period(days: NonZeroU32) -> Result<NonZeroU32, String> {
    if days.get() > MAX_LOAN_PERIOD_DAYS {
        return Err(format!(
            "loan_period_days must be at most {MAX_LOAN_PERIOD_DAYS} (got {days})"
        ));
    }
    Ok(days)
}

const fn default_loan_period_days() -> NonZeroU32 {
    NonZeroU32::new(14).unwrap()
}

const fn default_demo_data() -> bool {
    true
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        /// Days from checkout until a book is due.
        #[serde(default = "default_loan_period_days")]
        loan_period_days: NonZeroU32,

        #[serde(default = "default_demo_data")]
        demo_data: bool,
    },
}

impl TryFrom<Versions> for Config {
    type Error = String;

    fn try_from(versions: Versions) -> Result<Self, Self::Error> {
        match versions {
            Versions::V1 {
                loan_period_days,
                demo_data,
            } => Ok(Self {
                loan_period_days: checked_loan_period(loan_period_days)?,
                demo_data,
            }),
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            loan_period_days: config.loan_period_days,
            demo_data: config.demo_data,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nloan_period_days = 21\ndemo_data = false\n")
            .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.loan_period_days().get(), 21);
        assert_eq!(config.loan_period(), TimeDelta::days(21));
        assert!(!config.demo_data);
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn zero_loan_period_is_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nloan_period_days = 0\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn loan_period_beyond_limit_is_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nloan_period_days = 100000000\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
        assert!(error.contains("loan_period_days must be at most 36500"));
    }

    #[test]
    fn setter_refuses_period_beyond_limit() {
        let mut config = Config::default();
        let too_long = NonZeroU32::new(MAX_LOAN_PERIOD_DAYS + 1).unwrap();

        assert!(config.set_loan_period_days(too_long).is_err());
        assert_eq!(config.loan_period_days().get(), 14);

        let limit = NonZeroU32::new(MAX_LOAN_PERIOD_DAYS).unwrap();
        config.set_loan_period_days(limit).unwrap();
        assert_eq!(config.loan_period(), TimeDelta::days(36_500));
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
        assert_eq!(actual.loan_period(), TimeDelta::days(14));
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("shelf.toml");

        let mut config = Config::default();
        config.set_loan_period_days(NonZeroU32::new(7).unwrap()).unwrap();
        config.demo_data = false;
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }
}
