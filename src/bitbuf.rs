//! Bit-granular sink and source over byte storage.
//!
//! Both sides are MSB-first. The sink refuses any write that would push the
//! padded output past its byte capacity; the source refuses any read past the
//! declared bit length or the end of the underlying bytes. All capacity
//! arithmetic for the codec lives here.

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};

use crate::error::CodecError;

fn mask(width: u32) -> u32 {
    if width >= 32 {
        u32::MAX
    } else {
        (1u32 << width) - 1
    }
}

/// Append-only bit writer with a hard byte capacity.
pub struct BitSink {
    writer: BitWriter<Vec<u8>, BigEndian>,
    bits: usize,
    capacity: usize,
}

impl BitSink {
    pub fn with_capacity(capacity: usize) -> Self {
        // short strings are the norm, so don't trust huge capacities for preallocation
        let prealloc = capacity.min(1024);
        Self {
            writer: BitWriter::endian(Vec::with_capacity(prealloc), BigEndian),
            bits: 0,
            capacity,
        }
    }

    /// Append the low `width` bits of `code`, most significant first.
    pub fn write_bits(&mut self, code: u32, width: u32) -> Result<(), CodecError> {
        if width == 0 {
            return Ok(());
        }
        let needed = self.bits + width as usize;
        if needed > self.capacity.saturating_mul(8) {
            return Err(CodecError::OutputBufferTooSmall {
                capacity: self.capacity,
            });
        }
        self.writer.write(width, code & mask(width))?;
        self.bits = needed;
        Ok(())
    }

    pub fn bits_written(&self) -> usize {
        self.bits
    }

    /// Pad the final partial byte with zeros and hand back `(bytes, bit_len)`.
    pub fn flush(mut self) -> Result<(Vec<u8>, usize), CodecError> {
        self.writer.byte_align()?;
        Ok((self.writer.into_writer(), self.bits))
    }
}

/// Read-only bit cursor bounded by a declared length.
pub struct BitSource<'a> {
    reader: BitReader<&'a [u8], BigEndian>,
    pos: usize,
    declared: usize,
    physical: usize,
}

impl<'a> BitSource<'a> {
    pub fn new(data: &'a [u8], declared_bits: usize) -> Self {
        Self {
            reader: BitReader::endian(data, BigEndian),
            pos: 0,
            declared: declared_bits,
            physical: data.len() * 8,
        }
    }

    fn check(&self, width: u32) -> Result<(), CodecError> {
        let end = self.pos + width as usize;
        if end > self.declared || end > self.physical {
            return Err(CodecError::TruncatedStream { bit_pos: self.pos });
        }
        Ok(())
    }

    pub fn read_bit(&mut self) -> Result<bool, CodecError> {
        self.check(1)?;
        let bit = self
            .reader
            .read_bit()
            .map_err(|_| CodecError::TruncatedStream { bit_pos: self.pos })?;
        self.pos += 1;
        Ok(bit)
    }

    pub fn read_bits(&mut self, width: u32) -> Result<u32, CodecError> {
        if width == 0 {
            return Ok(0);
        }
        self.check(width)?;
        let value = self
            .reader
            .read::<u32>(width)
            .map_err(|_| CodecError::TruncatedStream { bit_pos: self.pos })?;
        self.pos += width as usize;
        Ok(value)
    }

    /// Bits left before the declared length, which may overstate what the
    /// underlying bytes actually hold.
    pub fn remaining_bits(&self) -> usize {
        self.declared.saturating_sub(self.pos)
    }

    pub fn position(&self) -> usize {
        self.pos
    }
}
