use thiserror::Error;

pub use super::decode_seq::Sequence;

pub type Array<'a> = Sequence<'a, 1>;
pub type Map<'a> = Sequence<'a, 2>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Need at least {0} more bytes of data")]
    NeedMoreData(usize),

    #[error("Array or map has fewer items than expected")]
    NotEnoughData,

    #[error("Additional items found in array or map")]
    AdditionalItems,

    #[error("Map has a key with no value")]
    PartialMap,

    #[error("Invalid minor-type value {0}")]
    InvalidMinorValue(u8),

    #[error("Invalid simple value {0}")]
    InvalidSimpleValue(u8),

    #[error("Unexpected break code")]
    UnexpectedBreak,

    #[error("Chunked string contains an invalid chunk")]
    InvalidChunk,

    #[error("Incorrect type, expecting {0}, found {1}")]
    IncorrectType(String, String),

    #[error("Integer value {0} is out of range")]
    IntegerOverflow(u64),

    #[error("Length {0} is too large")]
    LengthOverflow(u64),

    #[error("Maximum recursion depth reached")]
    MaxRecursion,

    #[error(transparent)]
    InvalidUtf8(#[from] core::str::Utf8Error),
}

pub trait FromCbor: Sized {
    type Error: From<self::Error>;

    /// Decodes a value from the start of `data`, returning the value and the
    /// number of bytes consumed, or `None` if `data` is empty.
    fn try_from_cbor(data: &[u8]) -> Result<Option<(Self, usize)>, Self::Error>;
}

#[derive(Debug)]
pub enum Value<'a, 'b> {
    UnsignedInteger(u64),
    NegativeInteger(u64),
    Bytes(&'a [u8]),
    ByteStream(Vec<&'a [u8]>),
    Text(&'a str),
    TextStream(Vec<&'a str>),
    Array(&'b mut Array<'a>),
    Map(&'b mut Map<'a>),
    False,
    True,
    Null,
    Undefined,
    Simple(u8),
    Float(f64),
}

impl Value<'_, '_> {
    pub fn type_name(&self, tagged: bool) -> String {
        let prefix = if tagged { "Tagged " } else { "" };
        let name = match self {
            Value::UnsignedInteger(_) => "Unsigned Integer",
            Value::NegativeInteger(_) => "Negative Integer",
            Value::Bytes(_) => "Definite-length Byte String",
            Value::ByteStream(_) => "Indefinite-length Byte String",
            Value::Text(_) => "Definite-length Text String",
            Value::TextStream(_) => "Indefinite-length Text String",
            Value::Array(a) if a.is_definite() => "Definite-length Array",
            Value::Array(_) => "Indefinite-length Array",
            Value::Map(m) if m.is_definite() => "Definite-length Map",
            Value::Map(_) => "Indefinite-length Map",
            Value::False => "False",
            Value::True => "True",
            Value::Null => "Null",
            Value::Undefined => "Undefined",
            Value::Simple(_) => "Simple Value",
            Value::Float(_) => "Float",
        };
        format!("{prefix}{name}")
    }

    /// Consumes any remaining items of an array or map value.
    pub fn skip(&mut self, max_recursion: usize) -> Result<(), Error> {
        match self {
            Value::Array(a) => a.skip_to_end(max_recursion),
            Value::Map(m) => m.skip_to_end(max_recursion),
            _ => Ok(()),
        }
    }
}

fn take(data: &[u8], n: usize) -> Result<&[u8], Error> {
    data.get(..n)
        .ok_or(Error::NeedMoreData(n.saturating_sub(data.len())))
}

fn be_uint(data: &[u8]) -> u64 {
    data.iter().fold(0, |acc, b| (acc << 8) | *b as u64)
}

fn parse_uint_minor(minor: u8, data: &[u8]) -> Result<(u64, usize), Error> {
    match minor {
        0..=23 => Ok((minor as u64, 0)),
        24 => take(data, 1).map(|b| (be_uint(b), 1)),
        25 => take(data, 2).map(|b| (be_uint(b), 2)),
        26 => take(data, 4).map(|b| (be_uint(b), 4)),
        27 => take(data, 8).map(|b| (be_uint(b), 8)),
        _ => Err(Error::InvalidMinorValue(minor)),
    }
}

fn parse_tags(data: &[u8]) -> Result<(Vec<u64>, usize), Error> {
    let mut tags = Vec::new();
    let mut offset = 0;
    while let Some(initial) = data.get(offset) {
        if initial >> 5 != 6 {
            break;
        }
        let (tag, len) = parse_uint_minor(initial & 0x1F, &data[offset + 1..])?;
        tags.push(tag);
        offset += len + 1;
    }
    Ok((tags, offset))
}

fn parse_data_minor(minor: u8, data: &[u8]) -> Result<(&[u8], usize), Error> {
    let (data_len, len) = parse_uint_minor(minor, data)?;
    let end = usize::try_from(data_len)
        .ok()
        .and_then(|data_len| data_len.checked_add(len))
        .ok_or(Error::LengthOverflow(data_len))?;
    take(data, end).map(|d| (&d[len..], end))
}

fn parse_data_chunked(major: u8, data: &[u8]) -> Result<(Vec<&[u8]>, usize), Error> {
    let mut chunks = Vec::new();
    let mut offset = 0;
    loop {
        let initial = *data.get(offset).ok_or(Error::NeedMoreData(1))?;
        offset += 1;
        if initial == 0xFF {
            break Ok((chunks, offset));
        }
        if initial >> 5 != major || initial & 0x1F == 31 {
            break Err(Error::InvalidChunk);
        }
        let (chunk, len) = parse_data_minor(initial & 0x1F, &data[offset..])?;
        chunks.push(chunk);
        offset += len;
    }
}

fn parse_count<const D: usize>(minor: u8, data: &[u8]) -> Result<(Option<usize>, usize), Error> {
    if minor == 31 {
        return Ok((None, 0));
    }
    let (count, len) = parse_uint_minor(minor, data)?;
    let count = usize::try_from(count)
        .ok()
        .and_then(|c| c.checked_mul(D))
        .ok_or(Error::LengthOverflow(count))?;
    Ok((Some(count), len))
}

pub fn try_parse_value<'a, T, F, E>(data: &'a [u8], f: F) -> Result<Option<(T, usize)>, E>
where
    F: FnOnce(Value<'a, '_>, Vec<u64>) -> Result<T, E>,
    E: From<Error>,
{
    let (tags, mut offset) = parse_tags(data)?;
    let Some(&initial) = data.get(offset) else {
        if tags.is_empty() {
            return Ok(None);
        }
        return Err(Error::NeedMoreData(1).into());
    };
    offset += 1;

    let minor = initial & 0x1F;
    let r = match initial >> 5 {
        0 => {
            let (v, len) = parse_uint_minor(minor, &data[offset..])?;
            offset += len;
            f(Value::UnsignedInteger(v), tags)?
        }
        1 => {
            let (v, len) = parse_uint_minor(minor, &data[offset..])?;
            offset += len;
            f(Value::NegativeInteger(v), tags)?
        }
        2 if minor == 31 => {
            let (chunks, len) = parse_data_chunked(2, &data[offset..])?;
            offset += len;
            f(Value::ByteStream(chunks), tags)?
        }
        2 => {
            let (v, len) = parse_data_minor(minor, &data[offset..])?;
            offset += len;
            f(Value::Bytes(v), tags)?
        }
        3 if minor == 31 => {
            let (chunks, len) = parse_data_chunked(3, &data[offset..])?;
            offset += len;
            let chunks = chunks
                .into_iter()
                .map(core::str::from_utf8)
                .collect::<Result<Vec<_>, _>>()
                .map_err(Error::from)?;
            f(Value::TextStream(chunks), tags)?
        }
        3 => {
            let (v, len) = parse_data_minor(minor, &data[offset..])?;
            offset += len;
            f(
                Value::Text(core::str::from_utf8(v).map_err(Error::from)?),
                tags,
            )?
        }
        4 => {
            let (count, len) = parse_count::<1>(minor, &data[offset..])?;
            let mut a = Array::new(data, count, offset + len);
            let r = f(Value::Array(&mut a), tags)?;
            offset = a.complete()?;
            r
        }
        5 => {
            let (count, len) = parse_count::<2>(minor, &data[offset..])?;
            let mut m = Map::new(data, count, offset + len);
            let r = f(Value::Map(&mut m), tags)?;
            offset = m.complete()?;
            r
        }
        6 => unreachable!("tags are consumed by parse_tags"),
        _ => match minor {
            20 => f(Value::False, tags)?,
            21 => f(Value::True, tags)?,
            22 => f(Value::Null, tags)?,
            23 => f(Value::Undefined, tags)?,
            0..=19 => f(Value::Simple(minor), tags)?,
            24 => {
                let v = take(&data[offset..], 1)?[0];
                if v < 32 {
                    return Err(Error::InvalidSimpleValue(v).into());
                }
                offset += 1;
                f(Value::Simple(v), tags)?
            }
            25 => {
                let v = take(&data[offset..], 2)?;
                offset += 2;
                f(
                    Value::Float(half::f16::from_be_bytes([v[0], v[1]]).to_f64()),
                    tags,
                )?
            }
            26 => {
                let v = take(&data[offset..], 4)?;
                offset += 4;
                f(
                    Value::Float(f32::from_bits(be_uint(v) as u32) as f64),
                    tags,
                )?
            }
            27 => {
                let v = take(&data[offset..], 8)?;
                offset += 8;
                f(Value::Float(f64::from_bits(be_uint(v))), tags)?
            }
            31 => return Err(Error::UnexpectedBreak.into()),
            _ => return Err(Error::InvalidMinorValue(minor).into()),
        },
    };
    Ok(Some((r, offset)))
}

pub fn parse_value<'a, T, F, E>(data: &'a [u8], f: F) -> Result<(T, usize), E>
where
    F: FnOnce(Value<'a, '_>, Vec<u64>) -> Result<T, E>,
    E: From<Error>,
{
    try_parse_value(data, f)?.ok_or(Error::NeedMoreData(1).into())
}

pub fn try_parse_array<'a, T, F, E>(data: &'a [u8], f: F) -> Result<Option<(T, usize)>, E>
where
    F: FnOnce(&mut Array<'a>, Vec<u64>) -> Result<T, E>,
    E: From<Error>,
{
    try_parse_value(data, |value, tags| match value {
        Value::Array(a) => f(a, tags),
        value => Err(
            Error::IncorrectType("Array".to_string(), value.type_name(!tags.is_empty())).into(),
        ),
    })
}

pub fn parse_array<'a, T, F, E>(data: &'a [u8], f: F) -> Result<(T, usize), E>
where
    F: FnOnce(&mut Array<'a>, Vec<u64>) -> Result<T, E>,
    E: From<Error>,
{
    try_parse_array(data, f)?.ok_or(Error::NeedMoreData(1).into())
}

pub fn try_parse<T>(data: &[u8]) -> Result<Option<(T, usize)>, T::Error>
where
    T: FromCbor,
{
    T::try_from_cbor(data)
}

/// Decodes a value from the start of `data`, returning the value and the
/// number of bytes consumed.
pub fn parse_detail<T>(data: &[u8]) -> Result<(T, usize), T::Error>
where
    T: FromCbor,
{
    T::try_from_cbor(data)?.ok_or(Error::NeedMoreData(1).into())
}

pub fn parse<T>(data: &[u8]) -> Result<T, T::Error>
where
    T: FromCbor,
{
    parse_detail(data).map(|(v, _)| v)
}

fn incorrect_type(expected: &str, value: &Value, tags: &[u64]) -> Error {
    Error::IncorrectType(expected.to_string(), value.type_name(!tags.is_empty()))
}

impl FromCbor for u64 {
    type Error = self::Error;

    fn try_from_cbor(data: &[u8]) -> Result<Option<(Self, usize)>, Self::Error> {
        try_parse_value(data, |value, tags| match value {
            Value::UnsignedInteger(v) => Ok(v),
            value => Err(incorrect_type("Unsigned Integer", &value, &tags)),
        })
    }
}

macro_rules! impl_uint_from_cbor {
    ($($ty:ty),*) => {
        $(
            impl FromCbor for $ty {
                type Error = self::Error;

                fn try_from_cbor(data: &[u8]) -> Result<Option<(Self, usize)>, Self::Error> {
                    match u64::try_from_cbor(data)? {
                        Some((v, len)) => <$ty>::try_from(v)
                            .map(|v| Some((v, len)))
                            .map_err(|_| Error::IntegerOverflow(v)),
                        None => Ok(None),
                    }
                }
            }
        )*
    };
}

impl_uint_from_cbor!(u8, u16, u32, usize);

impl FromCbor for i64 {
    type Error = self::Error;

    fn try_from_cbor(data: &[u8]) -> Result<Option<(Self, usize)>, Self::Error> {
        try_parse_value(data, |value, tags| match value {
            Value::UnsignedInteger(v) => i64::try_from(v).map_err(|_| Error::IntegerOverflow(v)),
            Value::NegativeInteger(v) => i64::try_from(v)
                .map(|v| -1 - v)
                .map_err(|_| Error::IntegerOverflow(v)),
            value => Err(incorrect_type("Integer", &value, &tags)),
        })
    }
}

impl FromCbor for bool {
    type Error = self::Error;

    fn try_from_cbor(data: &[u8]) -> Result<Option<(Self, usize)>, Self::Error> {
        try_parse_value(data, |value, tags| match value {
            Value::False => Ok(false),
            Value::True => Ok(true),
            value => Err(incorrect_type("Boolean", &value, &tags)),
        })
    }
}

impl FromCbor for String {
    type Error = self::Error;

    fn try_from_cbor(data: &[u8]) -> Result<Option<(Self, usize)>, Self::Error> {
        try_parse_value(data, |value, tags| match value {
            Value::Text(s) => Ok(s.to_string()),
            Value::TextStream(chunks) => Ok(chunks.concat()),
            value => Err(incorrect_type("Text String", &value, &tags)),
        })
    }
}

impl FromCbor for Vec<u8> {
    type Error = self::Error;

    fn try_from_cbor(data: &[u8]) -> Result<Option<(Self, usize)>, Self::Error> {
        try_parse_value(data, |value, tags| match value {
            Value::Bytes(b) => Ok(b.to_vec()),
            Value::ByteStream(chunks) => Ok(chunks.concat()),
            value => Err(incorrect_type("Byte String", &value, &tags)),
        })
    }
}

impl FromCbor for Box<[u8]> {
    type Error = self::Error;

    fn try_from_cbor(data: &[u8]) -> Result<Option<(Self, usize)>, Self::Error> {
        Vec::<u8>::try_from_cbor(data).map(|o| o.map(|(v, len)| (v.into(), len)))
    }
}

impl FromCbor for f64 {
    type Error = self::Error;

    fn try_from_cbor(data: &[u8]) -> Result<Option<(Self, usize)>, Self::Error> {
        try_parse_value(data, |value, tags| match value {
            Value::Float(v) => Ok(v),
            value => Err(incorrect_type("Float", &value, &tags)),
        })
    }
}
