//! Flat `KEY=value` credentials file parsing.

use std::path::Path;

use crate::SettingsError;

/// Static store endpoint tuple, loaded once at startup and immutable
/// afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreConfig {
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub region: String,
}

impl StoreConfig {
    /// Loads the config from a flat `KEY=value` text file.
    ///
    /// Recognized keys: `AWS_ACCESS_KEY`, `AWS_SECRET`, `AWS_BUCKET`,
    /// `AWS_REGION`. Lines without a `=` and unrecognized keys are
    /// ignored. A missing or unreadable file is a fatal startup error.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path).map_err(|e| SettingsError::ReadConfig {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self::parse(&contents))
    }

    fn parse(contents: &str) -> Self {
        let mut config = Self::default();
        for line in contents.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "AWS_ACCESS_KEY" => config.access_key = value.to_string(),
                "AWS_SECRET" => config.secret_key = value.to_string(),
                "AWS_BUCKET" => config.bucket = value.to_string(),
                "AWS_REGION" => config.region = value.to_string(),
                _ => {}
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_recognized_keys() {
        let config = StoreConfig::parse(
            "AWS_ACCESS_KEY=AKIAEXAMPLE\n\
             AWS_SECRET=sekrit\n\
             AWS_BUCKET=my-bucket\n\
             AWS_REGION=eu-central-1\n",
        );
        assert_eq!(
            config,
            StoreConfig {
                access_key: "AKIAEXAMPLE".into(),
                secret_key: "sekrit".into(),
                bucket: "my-bucket".into(),
                region: "eu-central-1".into(),
            }
        );
    }

    #[test]
    fn trims_whitespace_around_key_and_value() {
        let config = StoreConfig::parse("  AWS_BUCKET  =  my-bucket  \n");
        assert_eq!(config.bucket, "my-bucket");
    }

    #[test]
    fn ignores_malformed_and_unknown_lines() {
        let config = StoreConfig::parse(
            "this line has no equals sign\n\
             SOME_OTHER_KEY=whatever\n\
             AWS_REGION=us-east-1\n",
        );
        assert_eq!(config.region, "us-east-1");
        assert!(config.bucket.is_empty());
    }

    #[test]
    fn value_may_contain_equals() {
        let config = StoreConfig::parse("AWS_SECRET=abc=def==\n");
        assert_eq!(config.secret_key, "abc=def==");
    }

    #[test]
    fn load_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = StoreConfig::load(&dir.path().join("config.ini")).unwrap_err();
        assert!(matches!(err, SettingsError::ReadConfig { .. }));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "AWS_BUCKET=disk-bucket\n").unwrap();
        let config = StoreConfig::load(&path).unwrap();
        assert_eq!(config.bucket, "disk-bucket");
    }
}
