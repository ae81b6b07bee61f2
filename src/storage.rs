mod directory;
/// Decoding raw file bytes into clean XML text.
pub mod encoding;
mod file;

pub use directory::{Directory, DirectoryLoadError, FileFailure, Loaded, CONFIG_FILE};
pub use file::{load_bytes, load_file, load_str, LoadError};
