//! Compression of signature geometry for storage.

use crate::BoxFuture;
use crate::outline::OutlineRecord;
use base64::{Engine, engine::general_purpose::STANDARD};
use flate2::Compression;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use std::io::{Read, Write};
use thiserror::Error;

/// Codec errors.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Compression failed: {0}")]
    Compress(String),
    #[error("Decompression failed: {0}")]
    Decompress(String),
    #[error("Malformed signature data: {0}")]
    Format(String),
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Turns outline geometry into the text stored in a signature record.
///
/// `decompress(compress(x))` must reproduce every geometry field of `x`.
pub trait SignatureCodec {
    fn compress<'a>(&'a self, record: &'a OutlineRecord) -> BoxFuture<'a, CodecResult<String>>;

    fn decompress<'a>(&'a self, data: &'a str) -> BoxFuture<'a, CodecResult<OutlineRecord>>;
}

/// JSON, raw deflate, then base64.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeflateCodec {
    level: Option<u32>,
}

impl DeflateCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit deflate level (0-9).
    pub fn with_level(level: u32) -> Self {
        Self {
            level: Some(level.min(9)),
        }
    }

    fn compression(&self) -> Compression {
        self.level.map(Compression::new).unwrap_or_default()
    }

    /// Synchronous form of [`SignatureCodec::compress`].
    pub fn encode(&self, record: &OutlineRecord) -> CodecResult<String> {
        let json = serde_json::to_vec(record).map_err(|e| CodecError::Format(e.to_string()))?;
        let mut encoder = DeflateEncoder::new(Vec::new(), self.compression());
        encoder
            .write_all(&json)
            .map_err(|e| CodecError::Compress(e.to_string()))?;
        let bytes = encoder
            .finish()
            .map_err(|e| CodecError::Compress(e.to_string()))?;
        Ok(STANDARD.encode(bytes))
    }

    /// Synchronous form of [`SignatureCodec::decompress`].
    pub fn decode(&self, data: &str) -> CodecResult<OutlineRecord> {
        let bytes = STANDARD
            .decode(data)
            .map_err(|e| CodecError::Decompress(format!("base64: {}", e)))?;
        let mut json = Vec::new();
        DeflateDecoder::new(bytes.as_slice())
            .read_to_end(&mut json)
            .map_err(|e| CodecError::Decompress(e.to_string()))?;
        serde_json::from_slice(&json).map_err(|e| CodecError::Format(e.to_string()))
    }
}

impl SignatureCodec for DeflateCodec {
    fn compress<'a>(&'a self, record: &'a OutlineRecord) -> BoxFuture<'a, CodecResult<String>> {
        Box::pin(async move { self.encode(record) })
    }

    fn decompress<'a>(&'a self, data: &'a str) -> BoxFuture<'a, CodecResult<OutlineRecord>> {
        Box::pin(async move { self.decode(data) })
    }
}
