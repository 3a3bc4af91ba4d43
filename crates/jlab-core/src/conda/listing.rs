//! Parsing of `conda list --json` output.

use crate::config::EnvironmentConfig;
use crate::error::{JlabError, Result};
use serde::Deserialize;
use std::collections::BTreeSet;

/// One installed package as reported by `conda list --json`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PackageRecord {
    pub name: String,
    pub version: String,
}

/// Output of `conda list --json`.
///
/// conda answers with a package array when the environment exists and with
/// an object carrying an `error` key when it does not.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum CondaListing {
    Packages(Vec<PackageRecord>),
    Error { error: String },
}

impl CondaListing {
    /// Parse conda's JSON output.
    pub fn parse(stdout: &str) -> Result<Self> {
        serde_json::from_str(stdout).map_err(|e| JlabError::Json {
            message: format!("Error parsing conda output as JSON: {}", e),
            source: Some(e),
        })
    }

    pub fn packages(&self) -> &[PackageRecord] {
        match self {
            CondaListing::Packages(packages) => packages,
            CondaListing::Error { .. } => &[],
        }
    }

    /// Look up an installed package by name.
    pub fn find(&self, name: &str) -> Option<&PackageRecord> {
        self.packages().iter().find(|pkg| pkg.name == name)
    }

    /// Which of `required` are not installed, sorted by name.
    pub fn missing<'a>(&self, required: &[&'a str]) -> Vec<&'a str> {
        let installed: BTreeSet<&str> = self.packages().iter().map(|p| p.name.as_str()).collect();
        let missing: BTreeSet<&'a str> = required
            .iter()
            .copied()
            .filter(|name| !installed.contains(name))
            .collect();
        missing.into_iter().collect()
    }
}

/// Whether an installed menuinst version is usable.
///
/// Requires a `major.minor.patch` version with a numeric patch and a major
/// of at least 2; pre-release and build suffixes are rejected.
pub fn menuinst_version_supported(version: &str) -> bool {
    match semver::Version::parse(version) {
        Ok(parsed) => {
            parsed.major >= EnvironmentConfig::MENUINST_MIN_MAJOR
                && parsed.pre.is_empty()
                && parsed.build.is_empty()
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXISTING_ENV: &str = r#"[
        {"base_url": "https://conda.anaconda.org/conda-forge", "channel": "conda-forge", "name": "ipykernel", "version": "6.29.5"},
        {"channel": "conda-forge", "name": "python", "version": "3.12.4"}
    ]"#;

    const MISSING_ENV: &str = r#"{
        "caused_by": "None",
        "error": "EnvironmentLocationNotFound: Not a conda environment: /opt/conda/envs/nope",
        "exception_name": "EnvironmentLocationNotFound"
    }"#;

    #[test]
    fn test_parse_package_array() {
        let listing = CondaListing::parse(EXISTING_ENV).unwrap();
        assert_eq!(listing.packages().len(), 2);
        assert_eq!(listing.find("python").unwrap().version, "3.12.4");
        assert!(listing.find("jupyterlab").is_none());
    }

    #[test]
    fn test_parse_error_object() {
        let listing = CondaListing::parse(MISSING_ENV).unwrap();
        assert!(matches!(listing, CondaListing::Error { .. }));
        assert!(listing.packages().is_empty());
    }

    #[test]
    fn test_parse_garbage_is_json_error() {
        let err = CondaListing::parse("CondaError: something broke").unwrap_err();
        assert!(matches!(err, JlabError::Json { .. }));
    }

    #[test]
    fn test_missing_is_sorted() {
        let listing = CondaListing::parse(EXISTING_ENV).unwrap();
        let missing = listing.missing(&EnvironmentConfig::REQUIRED_PACKAGES);
        assert_eq!(missing, vec!["jupyterlab", "nb_conda_kernels"]);
    }

    #[test]
    fn test_menuinst_version_supported() {
        assert!(menuinst_version_supported("2.0.0"));
        assert!(menuinst_version_supported("2.1.2"));
        assert!(menuinst_version_supported("10.0.1"));

        assert!(!menuinst_version_supported("1.4.20"));
        assert!(!menuinst_version_supported("2.0.0rc1"));
        assert!(!menuinst_version_supported("2.0.0-rc1"));
        assert!(!menuinst_version_supported("2.1"));
        assert!(!menuinst_version_supported(""));
    }
}
