use crate::kind::TagType;
use std::{
    fmt::{self, Display},
    io,
};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    InvalidTagType(u8),
    TruncatedStream,
    MalformedLength(i64),
    CompressionError(String),
    ShortWrite,
    NotAList,
    NotACompound,
    ExpectedCompoundRoot(TagType),
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "i/o error: {e}"),
            Error::InvalidTagType(byte) => write!(f, "invalid tag type byte {byte}"),
            Error::TruncatedStream => write!(f, "unexpected end of decompressed stream"),
            Error::MalformedLength(len) => write!(f, "malformed length prefix {len}"),
            Error::CompressionError(msg) => write!(f, "compression engine error: {msg}"),
            Error::ShortWrite => write!(f, "sink refused bytes and cannot be retried"),
            Error::NotAList => write!(f, "expected a List tag"),
            Error::NotACompound => write!(f, "expected a Compound tag"),
            Error::ExpectedCompoundRoot(found) => {
                write!(f, "expected a Compound root tag, found {found}")
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        match value.kind() {
            io::ErrorKind::UnexpectedEof => Error::TruncatedStream,
            io::ErrorKind::WriteZero => Error::ShortWrite,
            _ => Error::Io(value),
        }
    }
}
