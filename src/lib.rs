//! brevity: compression for short human-readable strings.
//!
//! Text is coded as a stream of variable-length prefix codes drawn from a
//! handful of character sets (letters, digits, punctuation), with escapes to
//! switch sets, caps lock for upper-case runs, repeats, back-references and a
//! code point delta fallback for everything else. There is no header, so a
//! ten byte string costs well under ten bytes.
//!
//! Both sides must agree on the [`Preset`], and on any context lines passed
//! to [`Codec::compress_with_context`].
//!
//! The compressed blob is not self-describing. [`Codec::decompress`] assumes
//! the whole slice is meaningful; callers that need the exact bit length can
//! carry it in a [`Compressed`] container.

pub mod bitbuf;
pub mod codebook;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod state;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use crate::codebook::Preset;
pub use crate::config::CodecConfig;
pub use crate::error::{CodebookError, CodecError};

/// Worst-case compressed size for an input of `len` bytes.
///
/// No single input byte costs more than five output bytes, and the
/// terminator fits in the constant.
pub fn compress_bound(len: usize) -> usize {
    len.saturating_mul(5).saturating_add(3)
}

/// A compressed blob together with its exact length in bits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compressed {
    pub bit_len: usize,
    pub data: Vec<u8>,
}

impl Compressed {
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        bincode::serialize(self).map_err(|e| CodecError::SerializationError(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        bincode::deserialize(bytes).map_err(|e| CodecError::SerializationError(e.to_string()))
    }
}

/// Size figures for a single compression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressionReport {
    pub original_size: usize,
    pub compressed_size: usize,
    pub bit_len: usize,
    /// `compressed_size / original_size`; 1.0 for empty input.
    pub ratio: f64,
}

/// The codec engine. Holds only configuration, so one instance can be shared
/// freely across threads.
#[derive(Debug, Clone, Default)]
pub struct Codec {
    config: CodecConfig,
}

impl Codec {
    /// Create a codec, rejecting an invalid configuration.
    pub fn new(config: CodecConfig) -> Result<Self, CodecError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Compress with a ceiling of [`compress_bound`] bytes.
    pub fn compress(&self, input: &[u8]) -> Result<Vec<u8>, CodecError> {
        self.compress_with_capacity(input, compress_bound(input.len()))
    }

    /// Compress into at most `capacity` bytes.
    pub fn compress_with_capacity(
        &self,
        input: &[u8],
        capacity: usize,
    ) -> Result<Vec<u8>, CodecError> {
        let (data, _) = encoder::encode(input, capacity, &self.config)?;
        Ok(data)
    }

    /// Compress and keep the exact bit length.
    pub fn compress_framed(&self, input: &[u8]) -> Result<Compressed, CodecError> {
        let (data, bit_len) =
            encoder::encode(input, compress_bound(input.len()), &self.config)?;
        Ok(Compressed { bit_len, data })
    }

    /// Decompress a blob, treating every bit of it as declared.
    pub fn decompress(&self, compressed: &[u8]) -> Result<Vec<u8>, CodecError> {
        self.decompress_bits(compressed, compressed.len().saturating_mul(8))
    }

    /// Decompress reading no more than `bit_len` bits.
    pub fn decompress_bits(&self, compressed: &[u8], bit_len: usize) -> Result<Vec<u8>, CodecError> {
        decoder::decode(compressed, bit_len, &self.config)
    }

    pub fn decompress_framed(&self, compressed: &Compressed) -> Result<Vec<u8>, CodecError> {
        self.decompress_bits(&compressed.data, compressed.bit_len)
    }

    /// Compress one line of a series, letting back-references reach into
    /// earlier lines. `prev` is ordered oldest first.
    pub fn compress_with_context(
        &self,
        input: &[u8],
        prev: &[&[u8]],
    ) -> Result<Compressed, CodecError> {
        let (data, bit_len) = encoder::encode_with_context(
            input,
            compress_bound(input.len()),
            &self.config,
            prev,
        )?;
        Ok(Compressed { bit_len, data })
    }

    /// Inverse of [`Codec::compress_with_context`] given the same `prev` lines.
    pub fn decompress_with_context(
        &self,
        compressed: &Compressed,
        prev: &[&[u8]],
    ) -> Result<Vec<u8>, CodecError> {
        decoder::decode_with_context(&compressed.data, compressed.bit_len, &self.config, prev)
    }

    /// Compress `input` and report the sizes without keeping the output.
    pub fn analyze(&self, input: &[u8]) -> Result<CompressionReport, CodecError> {
        let framed = self.compress_framed(input)?;
        let ratio = if input.is_empty() {
            1.0
        } else {
            framed.data.len() as f64 / input.len() as f64
        };
        let report = CompressionReport {
            original_size: input.len(),
            compressed_size: framed.data.len(),
            bit_len: framed.bit_len,
            ratio,
        };
        debug!(
            original = report.original_size,
            compressed = report.compressed_size,
            ratio = report.ratio,
            "analyzed"
        );
        Ok(report)
    }
}

/// Compress with the default configuration.
pub fn compress(input: &[u8]) -> Result<Vec<u8>, CodecError> {
    Codec::default().compress(input)
}

/// Decompress with the default configuration.
pub fn decompress(compressed: &[u8]) -> Result<Vec<u8>, CodecError> {
    Codec::default().decompress(compressed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_hello_world() {
        let data = b"Hello, World!";
        let compressed = compress(data).unwrap();
        assert!(compressed.len() < data.len(), "got {} bytes", compressed.len());
        assert_eq!(decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn test_compress_empty() {
        let codec = Codec::default();
        let compressed = codec.compress(b"").unwrap();
        assert_eq!(compressed, vec![0]);
        assert_eq!(codec.decompress(&compressed).unwrap(), b"");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = CodecConfig {
            max_input_len: 0,
            ..CodecConfig::default()
        };
        assert!(matches!(Codec::new(config), Err(CodecError::Config(_))));
    }

    #[test]
    fn test_framed_roundtrip() {
        let codec = Codec::default();
        let data = "short string, 42 times: über".as_bytes();
        let framed = codec.compress_framed(data).unwrap();
        assert!(framed.bit_len <= framed.data.len() * 8);
        assert!(framed.bit_len > (framed.data.len() - 1) * 8);

        let restored = Compressed::from_bytes(&framed.to_bytes().unwrap()).unwrap();
        assert_eq!(restored, framed);
        assert_eq!(codec.decompress_framed(&restored).unwrap(), data);
    }

    #[test]
    fn test_container_rejects_garbage() {
        assert!(matches!(
            Compressed::from_bytes(&[1, 2]),
            Err(CodecError::SerializationError(_))
        ));
    }

    #[test]
    fn test_analyze_report() {
        let codec = Codec::default();
        let data = b"the quick brown fox jumps over the lazy dog";
        let report = codec.analyze(data).unwrap();
        assert_eq!(report.original_size, data.len());
        assert_eq!(report.compressed_size, codec.compress(data).unwrap().len());
        assert!(report.ratio < 1.0, "english text should shrink");
        assert_eq!(codec.analyze(b"").unwrap().ratio, 1.0);
    }

    #[test]
    fn test_context_lines_shrink_log_output() {
        let codec = Codec::default();
        let lines: [&[u8]; 4] = [
            b"2026-10-18 12:00:01 INFO worker started, queue=jobs",
            b"2026-10-18 12:00:02 INFO worker idle, queue=jobs",
            b"2026-10-18 12:00:05 WARN worker slow, queue=jobs",
            b"2026-10-18 12:00:09 INFO worker idle, queue=jobs",
        ];
        let mut alone = 0;
        let mut chained = 0;
        for (i, line) in lines.iter().enumerate() {
            let framed = codec.compress_with_context(line, &lines[..i]).unwrap();
            assert_eq!(
                codec.decompress_with_context(&framed, &lines[..i]).unwrap(),
                *line
            );
            chained += framed.data.len();
            alone += codec.compress(line).unwrap().len();
        }
        assert!(chained < alone, "{chained} vs {alone}");
    }

    #[test]
    fn test_context_mismatch_does_not_roundtrip() {
        let codec = Codec::default();
        let prev: [&[u8]; 1] = [b"the quick brown fox"];
        let framed = codec.compress_with_context(b"quick brown foxes", &prev).unwrap();
        let other: [&[u8]; 1] = [b"THE QUICK BROWN FOX"];
        let restored = codec.decompress_with_context(&framed, &other);
        assert_ne!(restored.ok().as_deref(), Some(&b"quick brown foxes"[..]));
    }

    #[test]
    fn test_presets_roundtrip() {
        let data = "{\"url\": \"https://www.example.com\"} the mention of 42 ünïcödé".as_bytes();
        for preset in Preset::ALL {
            let codec = Codec::new(CodecConfig {
                preset,
                ..CodecConfig::default()
            })
            .unwrap();
            let compressed = codec.compress(data).unwrap();
            assert_eq!(codec.decompress(&compressed).unwrap(), data, "{preset:?}");
        }
    }

    #[test]
    fn test_bound_holds_for_worst_bytes() {
        let codec = Codec::default();
        let nasty: Vec<u8> = (0u8..=255).rev().collect();
        let compressed = codec.compress(&nasty).unwrap();
        assert!(compressed.len() <= compress_bound(nasty.len()));
        assert_eq!(codec.decompress(&compressed).unwrap(), nasty);
    }
}
