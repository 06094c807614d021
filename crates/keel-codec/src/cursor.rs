//! Primitive reads over an in-memory byte buffer.
//!
//! Wire format of the primitives:
//! ```text
//! u8, u32, u64   big-endian, fixed width
//! bool           one byte, zero is false
//! bytes, string  u32 length, then that many bytes (strings are UTF-8)
//! digest         20 raw bytes
//! number         IEEE-754 binary64, big-endian bits
//! ```

use keel_hash::{Digest, DIGEST_LEN};

use crate::error::{DecodeError, DecodeResult};

/// A rewindable read position over a borrowed buffer.
///
/// Byte runs and strings are returned as slices of the input, so reading
/// them never allocates.
#[derive(Clone, Debug)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Move to an absolute offset, clamped to the end of the input.
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos.min(self.data.len());
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, n: usize) -> DecodeResult<&'a [u8]> {
        if self.remaining() < n {
            return Err(DecodeError::UnexpectedEof {
                offset: self.pos,
                needed: n,
                remaining: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> DecodeResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> DecodeResult<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u32(&mut self) -> DecodeResult<u32> {
        self.take_array().map(u32::from_be_bytes)
    }

    pub fn read_u64(&mut self) -> DecodeResult<u64> {
        self.take_array().map(u64::from_be_bytes)
    }

    pub fn read_bool(&mut self) -> DecodeResult<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_number(&mut self) -> DecodeResult<f64> {
        self.take_array().map(f64::from_be_bytes)
    }

    /// A length-prefixed byte run.
    pub fn read_bytes(&mut self) -> DecodeResult<&'a [u8]> {
        let len = self.read_u32()? as usize;
        self.take(len)
    }

    /// A length-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> DecodeResult<&'a str> {
        let offset = self.pos;
        let bytes = self.read_bytes()?;
        std::str::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8 { offset })
    }

    pub fn read_digest(&mut self) -> DecodeResult<Digest> {
        self.take_array::<DIGEST_LEN>().map(Digest::from_raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_big_endian() {
        let data = [0x01, 0x00, 0x00, 0x01, 0x00, 0, 0, 0, 0, 0, 0, 0, 0x02, 0x01];
        let mut c = ByteCursor::new(&data);
        assert_eq!(c.read_u8().unwrap(), 1);
        assert_eq!(c.read_u32().unwrap(), 256);
        assert_eq!(c.read_u64().unwrap(), 2);
        assert!(c.read_bool().unwrap());
        assert!(c.is_empty());
    }

    #[test]
    fn reads_string_without_copy() {
        let mut data = 5u32.to_be_bytes().to_vec();
        data.extend_from_slice(b"hello");
        let mut c = ByteCursor::new(&data);
        let s = c.read_string().unwrap();
        assert_eq!(s, "hello");
        assert_eq!(s.as_ptr(), data[4..].as_ptr());
    }

    #[test]
    fn invalid_utf8() {
        let mut data = 2u32.to_be_bytes().to_vec();
        data.extend_from_slice(&[0xff, 0xfe]);
        let err = ByteCursor::new(&data).read_string().unwrap_err();
        assert!(matches!(err, DecodeError::InvalidUtf8 { offset: 0 }));
    }

    #[test]
    fn eof_reports_position() {
        let data = [0u8; 3];
        let mut c = ByteCursor::new(&data);
        c.read_u8().unwrap();
        let err = c.read_u32().unwrap_err();
        assert!(matches!(
            err,
            DecodeError::UnexpectedEof { offset: 1, needed: 4, remaining: 2 }
        ));
    }

    #[test]
    fn length_prefix_past_end() {
        let data = 100u32.to_be_bytes();
        let err = ByteCursor::new(&data).read_bytes().unwrap_err();
        assert!(matches!(err, DecodeError::UnexpectedEof { needed: 100, .. }));
    }

    #[test]
    fn seek_rewinds() {
        let data = 7u32.to_be_bytes();
        let mut c = ByteCursor::new(&data);
        let start = c.position();
        assert_eq!(c.read_u32().unwrap(), 7);
        c.seek(start);
        assert_eq!(c.read_u32().unwrap(), 7);
        c.seek(1000);
        assert!(c.is_empty());
    }

    #[test]
    fn reads_number_and_digest() {
        let digest = Digest::of(b"chunk");
        let mut data = 2.5f64.to_be_bytes().to_vec();
        data.extend_from_slice(digest.as_bytes());
        let mut c = ByteCursor::new(&data);
        assert_eq!(c.read_number().unwrap(), 2.5);
        assert_eq!(c.read_digest().unwrap(), digest);
    }
}
