use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::domain::PublicationRecord;
use super::memory::InMemoryPublicationStore;

/// Exported record formats accepted by [`SeedLoader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedFormat {
    Csv,
    Json,
}

impl SeedFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Json,
        }
    }
}

#[derive(Debug)]
pub enum SeedError {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for SeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeedError::Io(err) => write!(f, "failed to read seed file: {}", err),
            SeedError::Csv(err) => write!(f, "invalid publication CSV data: {}", err),
            SeedError::Json(err) => write!(f, "invalid publication JSON data: {}", err),
        }
    }
}

impl std::error::Error for SeedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SeedError::Io(err) => Some(err),
            SeedError::Csv(err) => Some(err),
            SeedError::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for SeedError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for SeedError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<serde_json::Error> for SeedError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Builds an [`InMemoryPublicationStore`] from an exported collection.
pub struct SeedLoader;

impl SeedLoader {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<InMemoryPublicationStore, SeedError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Self::from_reader(file, SeedFormat::from_path(path))
    }

    pub fn from_reader<R: Read>(
        reader: R,
        format: SeedFormat,
    ) -> Result<InMemoryPublicationStore, SeedError> {
        let records = match format {
            SeedFormat::Csv => parse_csv(reader)?,
            SeedFormat::Json => serde_json::from_reader(reader)?,
        };
        Ok(InMemoryPublicationStore::new(records))
    }
}

fn parse_csv<R: Read>(reader: R) -> Result<Vec<PublicationRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader
        .deserialize::<PublicationRecord>()
        .collect::<Result<Vec<_>, _>>()
}
