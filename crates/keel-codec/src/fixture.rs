//! Byte-level builder for decoder test inputs.

use keel_hash::Digest;
use keel_types::Kind;

#[derive(Default)]
pub(crate) struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn kind(&mut self, kind: Kind) -> &mut Self {
        self.u8(kind.tag())
    }

    pub(crate) fn u8(&mut self, v: u8) -> &mut Self {
        self.buf.push(v);
        self
    }

    pub(crate) fn u32(&mut self, v: u32) -> &mut Self {
        self.buf.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub(crate) fn u64(&mut self, v: u64) -> &mut Self {
        self.buf.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub(crate) fn bool(&mut self, v: bool) -> &mut Self {
        self.u8(u8::from(v))
    }

    pub(crate) fn number(&mut self, v: f64) -> &mut Self {
        self.buf.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub(crate) fn bytes(&mut self, v: &[u8]) -> &mut Self {
        self.u32(v.len() as u32);
        self.buf.extend_from_slice(v);
        self
    }

    pub(crate) fn string(&mut self, v: &str) -> &mut Self {
        self.bytes(v.as_bytes())
    }

    pub(crate) fn digest(&mut self, d: &Digest) -> &mut Self {
        self.buf.extend_from_slice(d.as_bytes());
        self
    }

    // Whole values.

    pub(crate) fn number_value(&mut self, v: f64) -> &mut Self {
        self.kind(Kind::Number).number(v)
    }

    pub(crate) fn string_value(&mut self, v: &str) -> &mut Self {
        self.kind(Kind::String).string(v)
    }

    /// `struct Point { x: Number, y: Number }`
    pub(crate) fn point_type(&mut self) -> &mut Self {
        self.kind(Kind::Struct)
            .string("Point")
            .u32(2)
            .string("x")
            .kind(Kind::Number)
            .string("y")
            .kind(Kind::Number)
    }

    /// A `Ref<elem>` value.
    pub(crate) fn ref_value(&mut self, elem: Kind, target: &Digest, height: u64) -> &mut Self {
        self.kind(Kind::Ref).kind(elem).digest(target).u64(height)
    }

    pub(crate) fn to_vec(&self) -> Vec<u8> {
        self.buf.clone()
    }
}
