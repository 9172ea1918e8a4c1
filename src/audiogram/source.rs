use std::fs;
use std::path::PathBuf;
use crate::audiogram::error::AudiogramError;
/// Something a measurement file can be read from in one go.
pub trait MeasurementSource {
    /// Name used in error messages and plot titles.
    fn origin(&self) -> String;
    fn read_bytes(&mut self) -> Result<Vec<u8>, AudiogramError>;
}
/// Reads a file from disk. The handle is closed before parsing starts.
pub struct FileSource {
    path: PathBuf,
}
impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}
impl MeasurementSource for FileSource {
    fn origin(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
    fn read_bytes(&mut self) -> Result<Vec<u8>, AudiogramError> {
        fs::read(&self.path).map_err(|source| AudiogramError::Io {
            origin: self.path.display().to_string(),
            source,
        })
    }
}
/// In-memory source useful for tests and for callers that already hold the data.
pub struct MemorySource {
    name: String,
    bytes: Vec<u8>,
}
impl MemorySource {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}
impl MeasurementSource for MemorySource {
    fn origin(&self) -> String {
        self.name.clone()
    }
    fn read_bytes(&mut self) -> Result<Vec<u8>, AudiogramError> {
        Ok(self.bytes.clone())
    }
}
