use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration for loading a documentation corpus.
///
/// Read from `doxmodel.toml` in the corpus directory, if present. Every
/// field has a default, so an empty (versioned) file is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// File names to leave out of the corpus, in addition to `index.xml`.
    ///
    /// Names are matched against the file name only, not the full path.
    skip_files: Vec<String>,

    /// Whether to descend into subdirectories of the corpus root.
    ///
    /// Doxygen writes a flat directory, so this defaults to `false`.
    pub recursive: bool,

    /// Whether a single undecodable file fails the whole load.
    ///
    /// When `false` (default), failing files are logged, reported and
    /// left out of the corpus.
    pub strict: bool,

    /// Encoding label used for files that are not valid UTF-8 and declare
    /// no other encoding, e.g. `"windows-1252"`. A declared UTF-8 that does
    /// not hold falls back to it too.
    fallback_encoding: Option<String>,
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Returns the configured file names to skip.
    #[must_use]
    pub fn skip_files(&self) -> &[String] {
        &self.skip_files
    }

    /// Checks whether a file with this name should be loaded.
    ///
    /// The corpus index (`index.xml`) is always skipped; it lists compounds
    /// but documents none.
    #[must_use]
    pub fn is_skipped(&self, file_name: &str) -> bool {
        file_name.eq_ignore_ascii_case("index.xml") || self.skip_files.iter().any(|f| f == file_name)
    }

    /// Returns the fallback encoding label, if configured.
    #[must_use]
    pub fn fallback_encoding(&self) -> Option<&str> {
        self.fallback_encoding.as_deref()
    }

    /// Sets the fallback encoding label.
    pub fn set_fallback_encoding(&mut self, label: impl Into<String>) {
        self.fallback_encoding = Some(label.into());
    }

    /// Adds a file name to the skip list.
    ///
    /// Returns `true` if the name was added, `false` if it was already there.
    pub fn add_skip_file(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.skip_files.contains(&name) {
            false
        } else {
            self.skip_files.push(name);
            true
        }
    }
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        skip_files: Vec<String>,

        #[serde(default)]
        recursive: bool,

        #[serde(default)]
        strict: bool,

        /// An `encoding_rs` label.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fallback_encoding: Option<String>,
    },
}

impl From<Versions> for super::Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                skip_files,
                recursive,
                strict,
                fallback_encoding,
            } => Self {
                skip_files,
                recursive,
                strict,
                fallback_encoding,
            },
        }
    }
}

impl From<super::Config> for Versions {
    fn from(config: super::Config) -> Self {
        Self::V1 {
            skip_files: config.skip_files,
            recursive: config.recursive,
            strict: config.strict,
            fallback_encoding: config.fallback_encoding,
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
        file.write_all(
            b"_version = \"1\"\nskip_files = [\"Doxyfile.xml\"]\nrecursive = true\nstrict = true\nfallback_encoding = \"windows-1252\"\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.skip_files(), &["Doxyfile.xml".to_string()]);
        assert!(config.recursive);
        assert!(config.strict);
        assert_eq!(config.fallback_encoding(), Some("windows-1252"));
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nstrict = \"yes\"\n").unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn index_is_always_skipped() {
        let mut config = Config::default();
        assert!(config.is_skipped("index.xml"));
        assert!(!config.is_skipped("classfoo.xml"));

        assert!(config.add_skip_file("Doxyfile.xml"));
        assert!(!config.add_skip_file("Doxyfile.xml"));
        assert!(config.is_skipped("Doxyfile.xml"));
    }

    #[test]
    fn round_trips_through_toml() {
        let mut config = Config::default();
        config.strict = true;
        config.set_fallback_encoding("latin1");
        let text = toml::to_string(&config).unwrap();
        assert!(text.contains("_version = \"1\""));
        assert_eq!(toml::from_str::<Config>(&text).unwrap(), config);
    }
}
