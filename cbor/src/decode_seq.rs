use super::decode::*;

/// A cursor over the items of an array (`D == 1`) or map (`D == 2`).
///
/// Map keys and values are parsed as consecutive items.
#[derive(Debug)]
pub struct Sequence<'a, const D: usize> {
    data: &'a [u8],
    count: Option<usize>,
    offset: usize,
    parsed: usize,
}

impl<'a, const D: usize> Sequence<'a, D> {
    pub(super) fn new(data: &'a [u8], count: Option<usize>, offset: usize) -> Self {
        Self {
            data,
            count,
            offset,
            parsed: 0,
        }
    }

    /// The number of entries, if the sequence is of definite length.
    pub fn len(&self) -> Option<usize> {
        self.count.map(|c| c / D)
    }

    pub fn is_empty(&self) -> bool {
        self.count == Some(0)
    }

    pub fn is_definite(&self) -> bool {
        self.count.is_some()
    }

    /// The offset of the next item, relative to the start of the enclosing value.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The number of items parsed so far.
    pub fn parsed(&self) -> usize {
        self.parsed
    }

    fn check_for_end(&mut self) -> Result<bool, Error> {
        if let Some(count) = self.count {
            return Ok(self.parsed >= count);
        }
        match self.data.get(self.offset) {
            None => Err(Error::NeedMoreData(1)),
            Some(0xFF) => {
                if self.parsed % D != 0 {
                    return Err(Error::PartialMap);
                }
                self.offset += 1;
                self.count = Some(self.parsed);
                Ok(true)
            }
            Some(_) => Ok(false),
        }
    }

    /// Returns `true` if every item has been parsed, consuming the break code
    /// of an indefinite-length sequence.
    pub fn end(&mut self) -> Result<bool, Error> {
        self.check_for_end()
    }

    pub(super) fn complete(mut self) -> Result<usize, Error> {
        if !self.check_for_end()? {
            return Err(Error::AdditionalItems);
        }
        Ok(self.offset)
    }

    pub fn try_parse_value<T, F, E>(&mut self, f: F) -> Result<Option<T>, E>
    where
        F: FnOnce(Value<'a, '_>, Vec<u64>) -> Result<T, E>,
        E: From<Error>,
    {
        if self.check_for_end()? {
            return Ok(None);
        }
        let data: &'a [u8] = self.data;
        match try_parse_value(&data[self.offset..], f)? {
            Some((r, len)) => {
                self.offset += len;
                self.parsed += 1;
                Ok(Some(r))
            }
            None => Err(Error::NeedMoreData(1).into()),
        }
    }

    pub fn parse_value<T, F, E>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(Value<'a, '_>, Vec<u64>) -> Result<T, E>,
        E: From<Error>,
    {
        self.try_parse_value(f)?
            .ok_or(Error::NotEnoughData.into())
    }

    pub fn try_parse_array<T, F, E>(&mut self, f: F) -> Result<Option<T>, E>
    where
        F: FnOnce(&mut Array<'a>, Vec<u64>) -> Result<T, E>,
        E: From<Error>,
    {
        self.try_parse_value(|value, tags| match value {
            Value::Array(a) => f(a, tags),
            value => Err(Error::IncorrectType(
                "Array".to_string(),
                value.type_name(!tags.is_empty()),
            )
            .into()),
        })
    }

    pub fn parse_array<T, F, E>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Array<'a>, Vec<u64>) -> Result<T, E>,
        E: From<Error>,
    {
        self.try_parse_array(f)?
            .ok_or(Error::NotEnoughData.into())
    }

    pub fn try_parse<T>(&mut self) -> Result<Option<T>, T::Error>
    where
        T: FromCbor,
    {
        if self.check_for_end()? {
            return Ok(None);
        }
        match T::try_from_cbor(&self.data[self.offset..])? {
            Some((v, len)) => {
                self.offset += len;
                self.parsed += 1;
                Ok(Some(v))
            }
            None => Err(Error::NeedMoreData(1).into()),
        }
    }

    pub fn parse<T>(&mut self) -> Result<T, T::Error>
    where
        T: FromCbor,
    {
        self.try_parse::<T>()?.ok_or(Error::NotEnoughData.into())
    }

    /// Skips the next item, returning `false` if there were no more items.
    pub fn skip_value(&mut self, max_recursion: usize) -> Result<bool, Error> {
        self.try_parse_value(|mut value, _| value.skip(max_recursion))
            .map(|r| r.is_some())
    }

    pub fn skip_to_end(&mut self, max_recursion: usize) -> Result<(), Error> {
        if max_recursion == 0 {
            return Err(Error::MaxRecursion);
        }
        while self.skip_value(max_recursion - 1)? {}
        Ok(())
    }
}
