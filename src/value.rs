//! Dynamic row values accepted by column writers.

use std::collections::BTreeMap;

/// A dynamic value for one row of one column.
///
/// Writers never reject a value: a variant that does not fit the column (including
/// [`RowValue::Null`]) marks the slot null, unless the writer runs with
/// [`MismatchPolicy::Error`](crate::MismatchPolicy::Error).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RowValue {
    /// No value.
    Null,
    // Integer family
    /// 8-bit signed integer.
    Byte(i8),
    /// 16-bit signed integer.
    Short(i16),
    /// 32-bit signed integer.
    Int(i32),
    /// 64-bit signed integer.
    Long(i64),
    // Floating family
    /// 32-bit floating point.
    Float(f32),
    /// 64-bit floating point.
    Double(f64),
    /// UTF-8 string.
    Str(String),
    // Nested
    /// Ordered sequence for `List` columns.
    List(Vec<RowValue>),
    /// Ordered key/value entries for `Map` columns. Keys are expected to be unique.
    Map(Vec<(RowValue, RowValue)>),
    /// Named fields for `Struct` columns. Fields missing here are written as null.
    Record(BTreeMap<String, RowValue>),
}

impl RowValue {
    /// Widen an integer-family value to `i64`.
    #[inline]
    #[must_use]
    pub fn as_long(&self) -> Option<i64> {
        match *self {
            RowValue::Byte(v) => Some(i64::from(v)),
            RowValue::Short(v) => Some(i64::from(v)),
            RowValue::Int(v) => Some(i64::from(v)),
            RowValue::Long(v) => Some(v),
            _ => None,
        }
    }

    /// Widen a floating-family value to `f64`.
    #[inline]
    #[must_use]
    pub fn as_double(&self) -> Option<f64> {
        match *self {
            RowValue::Float(v) => Some(f64::from(v)),
            RowValue::Double(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow the string of a `Str` value.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RowValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this is [`RowValue::Null`].
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, RowValue::Null)
    }

    /// Variant name, used in diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            RowValue::Null => "Null",
            RowValue::Byte(_) => "Byte",
            RowValue::Short(_) => "Short",
            RowValue::Int(_) => "Int",
            RowValue::Long(_) => "Long",
            RowValue::Float(_) => "Float",
            RowValue::Double(_) => "Double",
            RowValue::Str(_) => "Str",
            RowValue::List(_) => "List",
            RowValue::Map(_) => "Map",
            RowValue::Record(_) => "Record",
        }
    }

    /// Build a record from `(name, value)` pairs.
    pub fn record<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, RowValue)>,
        S: Into<String>,
    {
        RowValue::Record(
            fields
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }

    /// Build a map from `(key, value)` entries, keeping their order.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<RowValue>,
        V: Into<RowValue>,
    {
        RowValue::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

macro_rules! impl_from_scalar {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for RowValue {
                #[inline]
                fn from(v: $t) -> Self {
                    RowValue::$variant(v)
                }
            }
        )*
    };
}

impl_from_scalar!(
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    String => Str,
);

impl From<&str> for RowValue {
    #[inline]
    fn from(v: &str) -> Self {
        RowValue::Str(v.to_string())
    }
}

impl<T: Into<RowValue>> From<Option<T>> for RowValue {
    #[inline]
    fn from(v: Option<T>) -> Self {
        v.map_or(RowValue::Null, Into::into)
    }
}

impl<T: Into<RowValue>> From<Vec<T>> for RowValue {
    fn from(v: Vec<T>) -> Self {
        RowValue::List(v.into_iter().map(Into::into).collect())
    }
}
