//! png/checksum.rs
//! CRC32 for chunks and Adler32 for the zlib stream.

/// Largest prime below 2^16.
const ADLER_MOD: u32 = 65_521;
/// Max bytes before the running sums must be reduced to avoid u32 overflow.
const ADLER_NMAX: usize = 5_552;

/// Adler-32 as defined by RFC 1950.
pub fn adler32(data: &[u8]) -> u32 {
    let mut a: u32 = 1;
    let mut b: u32 = 0;
    for block in data.chunks(ADLER_NMAX) {
        for &byte in block {
            a += u32::from(byte);
            b += a;
        }
        a %= ADLER_MOD;
        b %= ADLER_MOD;
    }
    (b << 16) | a
}

/// CRC-32 over a chunk's type and data, as stored in the chunk trailer.
pub fn chunk_crc(kind: &[u8; 4], data: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(kind);
    hasher.update(data);
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adler32_known_values() {
        assert_eq!(adler32(b""), 1);
        assert_eq!(adler32(b"Wikipedia"), 0x11E6_0398);
    }

    #[test]
    fn adler32_survives_long_runs() {
        // forces several NMAX reductions with maximal byte values
        let data = vec![0xFFu8; 100_000];
        let mut a: u64 = 1;
        let mut b: u64 = 0;
        for &x in &data {
            a = (a + u64::from(x)) % 65_521;
            b = (b + a) % 65_521;
        }
        assert_eq!(adler32(&data), ((b << 16) | a) as u32);
    }

    #[test]
    fn iend_crc_is_standard() {
        assert_eq!(chunk_crc(b"IEND", &[]), 0xAE42_6082);
    }
}
