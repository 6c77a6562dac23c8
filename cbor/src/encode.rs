use core::ops::Range;

/// Types that know their own CBOR encoding.
pub trait ToCbor {
    fn to_cbor(&self, encoder: &mut Encoder);
}

/// A definite-length byte string.
///
/// Plain `[u8]` slices are not `ToCbor`, so that `&[u8]` can never be
/// silently emitted as an array of integers.
#[derive(Debug, Copy, Clone)]
pub struct Bytes<'a>(pub &'a [u8]);

/// Pre-encoded CBOR, copied verbatim into the output.
#[derive(Debug, Copy, Clone)]
pub struct Raw<'a>(pub &'a [u8]);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
enum Major {
    Unsigned = 0,
    Negative = 1,
    Bytes = 2,
    Text = 3,
    Array = 4,
    Map = 5,
    Tag = 6,
    Simple = 7,
}

const INDEFINITE: u8 = 31;
const BREAK: u8 = 0xFF;

const FALSE: u8 = 20;
const TRUE: u8 = 21;
const NULL: u8 = 22;

/// An append-only CBOR output buffer.
#[derive(Debug, Default)]
pub struct Encoder {
    buf: Vec<u8>,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the encoder, returning everything written to it.
    pub fn build(self) -> Vec<u8> {
        self.buf
    }

    /// The number of bytes written so far.
    pub fn offset(&self) -> usize {
        self.buf.len()
    }

    // Writes the initial byte and argument of a data item, always in the
    // shortest form.
    fn head(&mut self, major: Major, arg: u64) {
        let (info, width) = match arg {
            0..=23 => (arg as u8, 0),
            24..=0xFF => (24, 1),
            0x100..=0xFFFF => (25, 2),
            0x1_0000..=0xFFFF_FFFF => (26, 4),
            _ => (27, 8),
        };
        self.buf.push(((major as u8) << 5) | info);
        self.buf.extend_from_slice(&arg.to_be_bytes()[8 - width..]);
    }

    fn simple(&mut self, value: u8) {
        self.buf.push(((Major::Simple as u8) << 5) | value)
    }

    fn content(&mut self, major: Major, data: &[u8]) -> Range<usize> {
        self.head(major, data.len() as u64);
        let start = self.buf.len();
        self.buf.extend_from_slice(data);
        start..self.buf.len()
    }

    pub fn emit_raw_slice(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data)
    }

    pub fn emit<T>(&mut self, value: &T)
    where
        T: ToCbor + ?Sized,
    {
        value.to_cbor(self)
    }

    /// Emits `value` preceded by each of `tags`, outermost first.
    pub fn emit_tagged<T>(&mut self, value: &T, tags: &[u64])
    where
        T: ToCbor + ?Sized,
    {
        tags.iter().for_each(|tag| self.head(Major::Tag, *tag));
        value.to_cbor(self)
    }

    /// Emits a byte string, returning the range of the string content.
    pub fn emit_bytes(&mut self, value: &[u8]) -> Range<usize> {
        self.content(Major::Bytes, value)
    }

    /// Emits an array of `count` items, or of indefinite length if `count`
    /// is `None`, with the items written by `f`.
    ///
    /// # Panics
    ///
    /// If `f` writes a different number of items than a definite `count`.
    pub fn emit_array<F>(&mut self, count: Option<usize>, f: F)
    where
        F: FnOnce(&mut Array),
    {
        let mut array = Array::open(self, Major::Array, count);
        f(&mut array);
        array.close()
    }

    /// As [`Encoder::emit_array`], but `count` and `f` are in key/value pairs.
    pub fn emit_map<F>(&mut self, count: Option<usize>, f: F)
    where
        F: FnOnce(&mut Map),
    {
        let mut map = Map::open(self, Major::Map, count);
        f(&mut map);
        map.close()
    }
}

/// Writes the items of an array (`D == 1`) or map (`D == 2`).
///
/// Map keys and values are written as consecutive items.
pub struct Sequence<'a, const D: usize> {
    encoder: &'a mut Encoder,
    expected: Option<usize>,
    written: usize,
}

pub type Array<'a> = Sequence<'a, 1>;
pub type Map<'a> = Sequence<'a, 2>;

impl<'a, const D: usize> Sequence<'a, D> {
    fn open(encoder: &'a mut Encoder, major: Major, count: Option<usize>) -> Self {
        match count {
            Some(count) => encoder.head(major, count as u64),
            None => encoder.buf.push(((major as u8) << 5) | INDEFINITE),
        }
        Self {
            encoder,
            expected: count.map(|count| count * D),
            written: 0,
        }
    }

    fn item(&mut self) -> &mut Encoder {
        self.written += 1;
        if let Some(expected) = self.expected {
            assert!(
                self.written <= expected,
                "definite-length sequence of {expected} items overflowed"
            );
        }
        self.encoder
    }

    fn close(self) {
        match self.expected {
            None => self.encoder.buf.push(BREAK),
            Some(expected) => assert_eq!(
                self.written, expected,
                "definite-length sequence written with the wrong number of items"
            ),
        }
    }

    pub fn emit<T>(&mut self, value: &T)
    where
        T: ToCbor + ?Sized,
    {
        value.to_cbor(self.item())
    }

    pub fn emit_bytes(&mut self, value: &[u8]) -> Range<usize> {
        self.item().emit_bytes(value)
    }

    pub fn emit_array<F>(&mut self, count: Option<usize>, f: F)
    where
        F: FnOnce(&mut Array),
    {
        self.item().emit_array(count, f)
    }

    pub fn emit_map<F>(&mut self, count: Option<usize>, f: F)
    where
        F: FnOnce(&mut Map),
    {
        self.item().emit_map(count, f)
    }
}

macro_rules! unsigned_to_cbor {
    ($($ty:ty),*) => {$(
        impl ToCbor for $ty {
            fn to_cbor(&self, encoder: &mut Encoder) {
                encoder.head(Major::Unsigned, *self as u64)
            }
        }
    )*};
}

unsigned_to_cbor!(u8, u16, u32, u64, usize);

macro_rules! signed_to_cbor {
    ($($ty:ty),*) => {$(
        impl ToCbor for $ty {
            fn to_cbor(&self, encoder: &mut Encoder) {
                let v = *self as i64;
                if v < 0 {
                    // -1 - v, without overflow at i64::MIN
                    encoder.head(Major::Negative, !v as u64)
                } else {
                    encoder.head(Major::Unsigned, v as u64)
                }
            }
        }
    )*};
}

signed_to_cbor!(i8, i16, i32, i64, isize);

impl ToCbor for bool {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.simple(if *self { TRUE } else { FALSE })
    }
}

impl ToCbor for str {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.content(Major::Text, self.as_bytes());
    }
}

impl ToCbor for String {
    fn to_cbor(&self, encoder: &mut Encoder) {
        self.as_str().to_cbor(encoder)
    }
}

impl ToCbor for Bytes<'_> {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.content(Major::Bytes, self.0);
    }
}

impl ToCbor for Raw<'_> {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.emit_raw_slice(self.0)
    }
}

/// `None` is encoded as CBOR `null`.
impl<T: ToCbor> ToCbor for Option<T> {
    fn to_cbor(&self, encoder: &mut Encoder) {
        match self {
            Some(value) => value.to_cbor(encoder),
            None => encoder.simple(NULL),
        }
    }
}

impl<T: ToCbor + ?Sized> ToCbor for &T {
    fn to_cbor(&self, encoder: &mut Encoder) {
        T::to_cbor(self, encoder)
    }
}

impl<A: ToCbor, B: ToCbor> ToCbor for (A, B) {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.emit_array(Some(2), |a| {
            a.emit(&self.0);
            a.emit(&self.1);
        })
    }
}

impl<T: ToCbor> ToCbor for [T] {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.emit_array(Some(self.len()), |a| self.iter().for_each(|v| a.emit(v)))
    }
}

impl<T: ToCbor, const N: usize> ToCbor for [T; N] {
    fn to_cbor(&self, encoder: &mut Encoder) {
        self[..].to_cbor(encoder)
    }
}

/// Encodes a single value.
pub fn emit<T>(value: &T) -> Vec<u8>
where
    T: ToCbor + ?Sized,
{
    let mut encoder = Encoder::new();
    value.to_cbor(&mut encoder);
    encoder.build()
}

/// Encodes a single array, see [`Encoder::emit_array`].
pub fn emit_array<F>(count: Option<usize>, f: F) -> Vec<u8>
where
    F: FnOnce(&mut Array),
{
    let mut encoder = Encoder::new();
    encoder.emit_array(count, f);
    encoder.build()
}
