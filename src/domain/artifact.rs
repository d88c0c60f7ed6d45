use serde::Serialize;
use std::path::PathBuf;

pub const CSV_MEDIA_TYPE: &str = "text/csv";

/// A rendered CSV export. The bytes belong to the request that produced them;
/// `path` is the shared location the export was also published to.
#[derive(Debug, Clone, Serialize)]
pub struct ExportArtifact {
    pub file_name: String,
    pub path: PathBuf,
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub rows: usize,
    pub sha256: String,
}
