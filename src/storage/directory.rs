//! A filesystem backed documentation corpus.
//!
//! The [`Directory`] finds the compound files under a root, loads each one
//! independently and in parallel, and only then hands the complete set to
//! the filesystem agnostic [`Corpus`] for resolution.

use std::{
    ffi::OsStr,
    fmt,
    path::{Path, PathBuf},
};

use encoding_rs::Encoding;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::instrument;
use walkdir::WalkDir;

use super::file::{load_file, LoadError};
use crate::domain::{Compound, Config, Corpus};

/// The name of the optional configuration file in the corpus root.
pub const CONFIG_FILE: &str = "doxmodel.toml";

/// A directory of compound XML files.
#[derive(Debug)]
pub struct Directory {
    /// The directory the compound files are read from.
    root: PathBuf,
    config: Config,
}

/// One file that could not be loaded.
#[derive(Debug)]
pub struct FileFailure {
    /// The file.
    pub path: PathBuf,
    /// Why it failed.
    pub error: LoadError,
}

/// The result of loading a directory.
#[derive(Debug)]
pub struct Loaded {
    corpus: Corpus,
    failures: Vec<FileFailure>,
}

impl Loaded {
    /// The resolved corpus.
    #[must_use]
    pub const fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Files that were skipped because they failed to load.
    #[must_use]
    pub fn failures(&self) -> &[FileFailure] {
        &self.failures
    }

    /// Takes the corpus, discarding the failure report.
    #[must_use]
    pub fn into_corpus(self) -> Corpus {
        self.corpus
    }
}

impl Directory {
    /// Opens a directory, reading `doxmodel.toml` from it if present.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        let config = load_config(&root);
        Self { root, config }
    }

    /// Opens a directory with an explicit configuration.
    #[must_use]
    pub const fn with_config(root: PathBuf, config: Config) -> Self {
        Self { root, config }
    }

    /// The root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The configuration in effect.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Loads and resolves every compound file in the directory.
    ///
    /// Files are decoded and normalized in parallel. A file that fails is
    /// logged and reported in [`Loaded::failures`], and the rest of the
    /// corpus is still resolved. Resolution starts only once every file has
    /// been processed, and sees the compounds in sorted path order.
    ///
    /// # Errors
    ///
    /// Returns an error if the root cannot be read or the configured
    /// fallback encoding is unknown. In strict mode, any failing file is
    /// also an error.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn load(&self) -> Result<Loaded, DirectoryLoadError> {
        let fallback = self.fallback_encoding()?;
        let paths = collect_xml_paths(&self.root, &self.config)?;
        tracing::debug!(files = paths.len(), "loading compound files");

        let results: Vec<Result<Compound, FileFailure>> = paths
            .par_iter()
            .map(|path| {
                load_file(path, fallback).map_err(|error| FileFailure {
                    path: path.clone(),
                    error,
                })
            })
            .collect();

        let mut compounds = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(compound) => compounds.push(compound),
                Err(failure) => {
                    tracing::warn!(
                        path = %failure.path.display(),
                        compound = failure.error.compound().unwrap_or("<unknown>"),
                        error = %failure.error,
                        "skipping file"
                    );
                    failures.push(failure);
                }
            }
        }

        if self.config.strict && !failures.is_empty() {
            return Err(DirectoryLoadError::FailedFiles(failures));
        }

        let corpus = Corpus::resolve(compounds);
        tracing::info!(
            compounds = corpus.len(),
            references = corpus.references().len(),
            skipped = failures.len(),
            "corpus loaded"
        );
        Ok(Loaded { corpus, failures })
    }

    fn fallback_encoding(&self) -> Result<Option<&'static Encoding>, DirectoryLoadError> {
        self.config
            .fallback_encoding()
            .map(|label| {
                Encoding::for_label(label.as_bytes())
                    .ok_or_else(|| DirectoryLoadError::UnknownEncoding(label.to_string()))
            })
            .transpose()
    }
}

/// An error loading a whole directory.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryLoadError {
    /// The root directory could not be read.
    Root(#[source] walkdir::Error),
    /// The configured fallback encoding label is not recognised.
    UnknownEncoding(String),
    /// Files failed to load in strict mode.
    FailedFiles(Vec<FileFailure>),
}

impl fmt::Display for DirectoryLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root(e) => write!(f, "Failed to read corpus directory: {e}"),
            Self::UnknownEncoding(label) => write!(f, "Unknown fallback encoding: {label}"),
            Self::FailedFiles(failures) => {
                write!(f, "Failed files: ")?;
                for (i, failure) in failures.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", failure.path.display())?;
                }
                Ok(())
            }
        }
    }
}

fn load_config(root: &Path) -> Config {
    let path = root.join(CONFIG_FILE);
    Config::load(&path).unwrap_or_else(|e| {
        if path.exists() {
            tracing::warn!("Failed to load config, using defaults: {e}");
        } else {
            tracing::debug!("Failed to load config: {e}");
        }
        Config::default()
    })
}

/// Collects the compound files under `root`, sorted by path.
fn collect_xml_paths(root: &Path, config: &Config) -> Result<Vec<PathBuf>, DirectoryLoadError> {
    let max_depth = if config.recursive { usize::MAX } else { 1 };
    let mut paths = Vec::new();

    for entry in WalkDir::new(root).max_depth(max_depth) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(DirectoryLoadError::Root(e)),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {e}");
                continue;
            }
        };
        if !entry.file_type().is_file() || entry.path().extension() != Some(OsStr::new("xml")) {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if config.is_skipped(&name) {
            tracing::trace!(file = %name, "skipping configured file");
            continue;
        }
        paths.push(entry.into_path());
    }

    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::domain::NO_OWNER;

    fn group(id: &str, body: &str) -> String {
        format!(
            r#"<?xml version='1.0' encoding='UTF-8' standalone='no'?>
<doxygen version="1.9.8"><compounddef id="{id}" kind="group"><compoundname>{id}</compoundname>{body}</compounddef></doxygen>"#
        )
    }

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    fn setup_temp_directory() -> TempDir {
        let tmp = TempDir::new().expect("failed to create temp dir");
        write(
            tmp.path(),
            "group__b.xml",
            &group(
                "grpB",
                r#"<detaileddescription><para><anchor id="anchorX"/></para></detaileddescription>"#,
            ),
        );
        write(
            tmp.path(),
            "group__a.xml",
            &group("grpA", r#"<innergroup refid="grpB">B</innergroup>"#),
        );
        write(tmp.path(), "index.xml", "<doxygenindex></doxygenindex>");
        write(tmp.path(), "notes.txt", "not a compound");
        tmp
    }

    #[test]
    fn loads_and_resolves() {
        let tmp = setup_temp_directory();
        let loaded = Directory::new(tmp.path().to_path_buf()).load().unwrap();
        let corpus = loaded.corpus();

        assert!(loaded.failures().is_empty());
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.compounds()[0].id, "grpa", "sorted path order");
        assert_eq!(corpus.compound("grpB").unwrap().parent.as_deref(), Some("grpa"));
        assert_eq!(corpus.references().get("grpA").unwrap().owner_id(), NO_OWNER);
        assert_eq!(corpus.references().get("anchorx").unwrap().owner_id(), "grpb");
    }

    #[test]
    fn bad_files_are_skipped_and_reported() {
        let tmp = setup_temp_directory();
        write(
            tmp.path(),
            "broken.xml",
            &group("grpC", "<detaileddescription><blink/></detaileddescription>"),
        );

        let loaded = Directory::new(tmp.path().to_path_buf()).load().unwrap();
        assert_eq!(loaded.corpus().len(), 2);
        assert_eq!(loaded.failures().len(), 1);
        assert!(loaded.failures()[0].path.ends_with("broken.xml"));
        assert_eq!(loaded.failures()[0].error.compound(), Some("grpC"));
    }

    #[test]
    fn strict_mode_fails_the_load() {
        let tmp = setup_temp_directory();
        write(tmp.path(), "broken.xml", "<doxygen><compounddef");
        write(tmp.path(), CONFIG_FILE, "_version = \"1\"\nstrict = true\n");

        let error = Directory::new(tmp.path().to_path_buf()).load().unwrap_err();
        let DirectoryLoadError::FailedFiles(failures) = &error else {
            panic!("expected failed files, got {error:?}");
        };
        assert_eq!(failures.len(), 1);
        assert!(error.to_string().contains("broken.xml"));
    }

    #[test]
    fn skip_files_and_recursion() {
        let tmp = setup_temp_directory();
        fs::create_dir(tmp.path().join("nested")).unwrap();
        write(&tmp.path().join("nested"), "group__n.xml", &group("grpN", ""));

        let flat = Directory::new(tmp.path().to_path_buf()).load().unwrap();
        assert!(flat.corpus().compound("grpn").is_none());

        let mut config = Config::default();
        config.recursive = true;
        config.add_skip_file("group__b.xml");
        let nested = Directory::with_config(tmp.path().to_path_buf(), config)
            .load()
            .unwrap();
        assert!(nested.corpus().compound("grpn").is_some());
        assert!(nested.corpus().compound("grpb").is_none());
    }

    #[test]
    fn fallback_encoding_from_config() {
        let tmp = TempDir::new().unwrap();
        let mut bytes = b"<?xml version='1.0' encoding='UTF-8' standalone='no'?>\n\
<doxygen><compounddef id=\"p\" kind=\"page\"><compoundname>Caf"
            .to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b"</compoundname></compounddef></doxygen>");
        fs::write(tmp.path().join("p.xml"), bytes).unwrap();
        write(
            tmp.path(),
            CONFIG_FILE,
            "_version = \"1\"\nfallback_encoding = \"windows-1252\"\n",
        );

        let loaded = Directory::new(tmp.path().to_path_buf()).load().unwrap();
        assert_eq!(loaded.corpus().compound("p").unwrap().name, "Caf\u{e9}");
    }

    #[test]
    fn unknown_fallback_encoding() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.set_fallback_encoding("klingon");
        let error = Directory::with_config(tmp.path().to_path_buf(), config)
            .load()
            .unwrap_err();
        assert!(matches!(error, DirectoryLoadError::UnknownEncoding(label) if label == "klingon"));
    }

    #[test]
    fn missing_root_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let error = Directory::new(tmp.path().join("absent")).load().unwrap_err();
        assert!(matches!(error, DirectoryLoadError::Root(_)));
    }
}
