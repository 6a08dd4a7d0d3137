use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BinParse {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error(
        "Read of {length} bytes at offset {offset} exceeds available \
         {available}"
    )]
    Truncated {
        offset: usize,
        length: usize,
        available: usize,
    },

    #[error("{0}")]
    Format(String),
}

impl BinParse {
    pub(crate) fn format(message: impl Into<String>) -> Self {
        BinParse::Format(message.into())
    }
}

pub type BinParseResult<T> = std::result::Result<T, BinParse>;
