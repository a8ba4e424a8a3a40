use thiserror::Error;

/// A failure while reading a streaming cursor.
#[derive(Debug, Error)]
pub enum StreamReadError {
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("unexpected end of stream before a tag")]
    UnexpectedEndOfStream,
    #[error("unexpected content before a tag: {0:?}")]
    UnexpectedContent(String),
    #[error("unknown namespace prefix: {0}")]
    UnknownPrefix(String),
    #[error("invalid UTF-8 in stream")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("cannot serialize stream events: {0}")]
    Write(String),
}

/// A failure to construct or run a transform into a tree.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("source has nothing to transform")]
    NoSource,
    #[error("cannot parse source: {0}")]
    Parse(#[from] xot::ParseError),
    #[error("Xot error: {0}")]
    Xot(#[from] xot::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot read stream source: {0}")]
    Stream(#[from] StreamReadError),
    #[error("invalid UTF-8 in source")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("transform result has no document element")]
    NoDocumentElement,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("could not read next tag: {0}")]
    StreamRead(#[from] StreamReadError),
    #[error("transform failed: {0}")]
    Transform(#[from] TransformError),
}

pub type Result<T> = std::result::Result<T, Error>;
