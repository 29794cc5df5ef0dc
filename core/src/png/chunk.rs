//! png/chunk.rs
//! Chunk framing: `length (4, BE) || type (4) || data || crc32 (4, BE)`.

use byteorder::{BigEndian, ByteOrder};

use crate::png::checksum::chunk_crc;
use crate::png::types::PngError;

/// length + type + crc
pub const CHUNK_OVERHEAD: usize = 12;
/// PNG limits chunk data to 2^31 - 1 bytes.
pub const MAX_CHUNK_DATA: usize = i32::MAX as usize;

/// Append one framed chunk to `out`.
pub fn write_chunk(out: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) {
    debug_assert!(data.len() <= MAX_CHUNK_DATA);
    out.reserve(CHUNK_OVERHEAD + data.len());
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(kind);
    out.extend_from_slice(data);
    out.extend_from_slice(&chunk_crc(kind, data).to_be_bytes());
}

/// A chunk borrowed from the file buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub kind: [u8; 4],
    pub data: &'a [u8],
}

impl Chunk<'_> {
    pub fn kind_str(&self) -> String {
        String::from_utf8_lossy(&self.kind).into_owned()
    }
}

/// Walks top-level chunks by their length prefix, verifying each CRC.
///
/// Stops at the end of the buffer; yields an error and then stops on the
/// first malformed chunk.
pub struct ChunkReader<'a> {
    buf: &'a [u8],
    pos: usize,
    failed: bool,
}

impl<'a> ChunkReader<'a> {
    /// `buf` starts right after the signature.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0, failed: false }
    }

    fn read_next(&mut self) -> Result<Chunk<'a>, PngError> {
        let rest = &self.buf[self.pos..];
        if rest.len() < CHUNK_OVERHEAD {
            return Err(PngError::Malformed(format!(
                "truncated chunk at offset {}",
                self.pos
            )));
        }

        let len = BigEndian::read_u32(&rest[0..4]) as usize;
        if len > MAX_CHUNK_DATA || rest.len() - CHUNK_OVERHEAD < len {
            return Err(PngError::Malformed(format!(
                "chunk length {} exceeds remaining {} bytes",
                len,
                rest.len() - CHUNK_OVERHEAD
            )));
        }

        let mut kind = [0u8; 4];
        kind.copy_from_slice(&rest[4..8]);
        let data = &rest[8..8 + len];
        let stored = BigEndian::read_u32(&rest[8 + len..12 + len]);
        let computed = chunk_crc(&kind, data);
        if stored != computed {
            return Err(PngError::Malformed(format!(
                "CRC mismatch in {} chunk: stored {:#010x}, computed {:#010x}",
                String::from_utf8_lossy(&kind),
                stored,
                computed
            )));
        }

        self.pos += CHUNK_OVERHEAD + len;
        Ok(Chunk { kind, data })
    }
}

impl<'a> Iterator for ChunkReader<'a> {
    type Item = Result<Chunk<'a>, PngError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.buf.len() {
            return None;
        }
        let item = self.read_next();
        if item.is_err() {
            self.failed = true;
        }
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_back_written_chunks() {
        let mut buf = Vec::new();
        write_chunk(&mut buf, b"tEXt", b"hello");
        write_chunk(&mut buf, b"IEND", &[]);

        let chunks: Vec<_> = ChunkReader::new(&buf).collect::<Result<_, _>>().unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(&chunks[0].kind, b"tEXt");
        assert_eq!(chunks[0].data, b"hello");
        assert_eq!(chunks[1].kind_str(), "IEND");
    }

    #[test]
    fn crc_mismatch_is_malformed() {
        let mut buf = Vec::new();
        write_chunk(&mut buf, b"tEXt", b"hello");
        buf[9] ^= 0xFF;
        let mut reader = ChunkReader::new(&buf);
        assert!(matches!(reader.next(), Some(Err(PngError::Malformed(_)))));
        assert!(reader.next().is_none());
    }

    #[test]
    fn oversized_length_is_malformed() {
        let mut buf = Vec::new();
        write_chunk(&mut buf, b"tEXt", b"hello");
        buf[3] = 200;
        assert!(matches!(
            ChunkReader::new(&buf).next(),
            Some(Err(PngError::Malformed(_)))
        ));
    }
}
