#[derive(Debug, thiserror::Error)]
pub enum StyError {
    #[error("not a GBST style file")]
    MalformedHeader,
    #[error("unsupported style file version: {version}")]
    UnsupportedVersion { version: u16 },
    #[error("chunk {tag} at offset {offset} overruns the file")]
    TruncatedChunk { tag: String, offset: usize },
    #[error("chunk {tag} has length {actual}, expected {expected}")]
    SizeMismatch {
        tag: String,
        expected: usize,
        actual: usize,
    },
    #[error("chunk {tag} is not supported")]
    UnsupportedChunk { tag: String },
    #[error("palette index {index} out of range (limit {limit})")]
    InvalidIndex { index: usize, limit: usize },
    #[error("Error parsing style data: {source}")]
    NomError {
        #[source]
        source: nom::Err<nom::error::Error<Vec<u8>>>,
    },
    #[error("Error opening style file: {source}")]
    IOError {
        #[source]
        source: std::io::Error,
    },
}
