//! Typed value to text conversion.
//!
//! Values are rendered as the literal text the backend expects
//! (dates as `yyyy-mm-dd`, times as `hh:mm:ss`, text unchanged).
//!
//! Array columns are packed into one text field with length-prefixed
//! framing: every element is written as `<len> <element>`, where `len` is
//! the element's character count in decimal and exactly one space separates
//! it from the payload. There is no other delimiter, so payloads may contain
//! any character.
//!
//! ```
//! use pgcond::codec::{array_to_string, decode_array};
//!
//! let packed = array_to_string(["a b", "", "12"], |s| s.to_string());
//! assert_eq!(packed, "3 a b0 2 12");
//! assert_eq!(decode_array(&packed).unwrap(), vec!["a b", "", "12"]);
//! ```

use crate::error::{QueryError, QueryResult};
use crate::types::ColumnType;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt::Write;

/// A Rust value that can be rendered as the text of a column value.
pub trait ColumnValue {
    /// Render the value for a column of type `ty`.
    fn to_column_string(&self, ty: ColumnType) -> String;

    /// SQL `NULL` rather than a value.
    fn is_null(&self) -> bool {
        false
    }
}

/// Render `value` for a column of type `ty`.
pub fn value_to_string<V: ColumnValue + ?Sized>(ty: ColumnType, value: &V) -> String {
    value.to_column_string(ty)
}

/// Format a date as `yyyy-mm-dd`.
pub fn date_to_string(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Format a time of day as `hh:mm:ss`.
pub fn time_to_string(time: &NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}

macro_rules! impl_display_value {
    ($($t:ty),* $(,)?) => {
        $(
            impl ColumnValue for $t {
                fn to_column_string(&self, _ty: ColumnType) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

impl_display_value!(i16, i32, i64, u16, u32, u64, f32, f64, bool, uuid::Uuid);

impl ColumnValue for str {
    fn to_column_string(&self, _ty: ColumnType) -> String {
        self.to_string()
    }
}

impl ColumnValue for String {
    fn to_column_string(&self, _ty: ColumnType) -> String {
        self.clone()
    }
}

impl ColumnValue for NaiveDate {
    fn to_column_string(&self, _ty: ColumnType) -> String {
        date_to_string(self)
    }
}

impl ColumnValue for NaiveTime {
    fn to_column_string(&self, _ty: ColumnType) -> String {
        time_to_string(self)
    }
}

impl ColumnValue for NaiveDateTime {
    fn to_column_string(&self, ty: ColumnType) -> String {
        match ty {
            ColumnType::Date => date_to_string(&self.date()),
            ColumnType::Time => time_to_string(&self.time()),
            _ => self.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Blobs render as Postgres hex (`\x0aff`).
impl ColumnValue for [u8] {
    fn to_column_string(&self, _ty: ColumnType) -> String {
        let mut out = String::with_capacity(2 + self.len() * 2);
        out.push_str("\\x");
        for b in self {
            let _ = write!(out, "{b:02x}");
        }
        out
    }
}

impl ColumnValue for Vec<u8> {
    fn to_column_string(&self, ty: ColumnType) -> String {
        self.as_slice().to_column_string(ty)
    }
}

/// `None` is SQL `NULL`; its text form is the bare keyword.
impl<T: ColumnValue> ColumnValue for Option<T> {
    fn to_column_string(&self, ty: ColumnType) -> String {
        match self {
            Some(v) => v.to_column_string(ty),
            None => "NULL".to_string(),
        }
    }

    fn is_null(&self) -> bool {
        self.as_ref().is_none_or(ColumnValue::is_null)
    }
}

impl<T: ColumnValue + ?Sized> ColumnValue for &T {
    fn to_column_string(&self, ty: ColumnType) -> String {
        (**self).to_column_string(ty)
    }

    fn is_null(&self) -> bool {
        (**self).is_null()
    }
}

/// Pack a sequence into one string with length-prefixed framing.
pub fn array_to_string<I, T, F>(items: I, mut to_str: F) -> String
where
    I: IntoIterator<Item = T>,
    F: FnMut(T) -> String,
{
    let mut out = String::new();
    for item in items {
        let s = to_str(item);
        let _ = write!(out, "{} ", s.chars().count());
        out.push_str(&s);
    }
    out
}

/// Pack typed values of an array column.
pub fn array_value<T: ColumnValue>(ty: ColumnType, values: &[T]) -> String {
    array_to_string(values, |v| v.to_column_string(ty))
}

/// Unpack a length-prefixed string, passing each element to `append`.
///
/// Returns the number of decoded elements. Empty input decodes to zero
/// elements. A length token that is not a decimal number, a token without the
/// separating space, or a length running past the end of the input stops
/// decoding with [`QueryError::Decode`]; elements before the malformed token
/// have already been passed to `append`.
pub fn string_to_array<F>(encoded: &str, mut append: F) -> QueryResult<usize>
where
    F: FnMut(String),
{
    let mut rest = encoded;
    let mut offset = 0usize;
    let mut count = 0usize;

    while !rest.is_empty() {
        let Some(space) = rest.find(' ') else {
            return Err(decode_failure(offset, "length token without separator"));
        };
        let token = &rest[..space];
        if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
            return Err(decode_failure(offset, &format!("invalid length token '{token}'")));
        }
        let len: usize = token
            .parse()
            .map_err(|_| decode_failure(offset, &format!("length '{token}' out of range")))?;

        let payload = &rest[space + 1..];
        let Some(end) = char_boundary(payload, len) else {
            return Err(decode_failure(
                offset,
                &format!("length {len} exceeds remaining input"),
            ));
        };
        append(payload[..end].to_string());
        count += 1;

        offset += space + 1 + end;
        rest = &payload[end..];
    }

    Ok(count)
}

/// Unpack a length-prefixed string into a vector. Never returns partial data.
pub fn decode_array(encoded: &str) -> QueryResult<Vec<String>> {
    let mut out = Vec::new();
    string_to_array(encoded, |s| out.push(s))?;
    Ok(out)
}

/// Byte index just past the first `n` chars of `s`.
fn char_boundary(s: &str, n: usize) -> Option<usize> {
    if n == 0 {
        return Some(0);
    }
    s.char_indices().map(|(i, c)| i + c.len_utf8()).nth(n - 1)
}

fn decode_failure(offset: usize, message: &str) -> QueryError {
    tracing::trace!(target: "pgcond", offset, reason = message, "array decode failed");
    QueryError::decode(format!("{message} at byte {offset}"))
}
