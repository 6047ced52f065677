use chrono::{DateTime, FixedOffset, NaiveDate, Timelike};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Insertion-ordered mapping of field names to values.
///
/// Iteration order is the order keys were inserted and becomes the sibling
/// order of the generated elements.
pub type FieldMap = IndexMap<String, FieldValue>;

/// A value stored under a [`FieldMap`] key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Leaf value rendered as element text.
    Scalar(Scalar),
    /// Nested mapping rendered as a branch element.
    Map(FieldMap),
    /// Repeated elements sharing the key as tag name.
    List(Vec<FieldValue>),
    /// Explicit absence. Never valid input for conversion: omit the key instead.
    Null,
}

impl FieldValue {
    /// Short name of the value kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Map(_) => "mapping",
            Self::List(_) => "sequence",
            Self::Null => "null",
        }
    }
}

/// A leaf value with exactly one canonical text form per variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    /// Passed through unchanged.
    Text(String),
    /// Base-10 integer.
    Integer(i64),
    /// Decimal keeping its scale (`5.00` stays `5.00`).
    Decimal(Decimal),
    /// Shortest representation that reads back to the same `f64`.
    Float(f64),
    /// `YYYY-MM-DD`.
    Date(NaiveDate),
    /// `YYYY-MM-DDTHH:MM:SS.mmm±HH:MM`, widened to 6 or 9 fractional digits
    /// when the value carries sub-millisecond precision.
    DateTime(DateTime<FixedOffset>),
}

impl Scalar {
    /// Canonical text content, or `None` if the value has no textual form
    /// (non-finite floats).
    pub fn canonical_text(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Integer(i) => Some(i.to_string()),
            Self::Decimal(d) => Some(d.to_string()),
            Self::Float(f) if f.is_finite() => Some(f.to_string()),
            Self::Float(_) => None,
            Self::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            Self::DateTime(dt) => {
                let fraction = match dt.nanosecond() % 1_000_000_000 {
                    n if n % 1_000_000 == 0 => "%.3f",
                    n if n % 1_000 == 0 => "%.6f",
                    _ => "%.9f",
                };
                Some(dt.format(&format!("%Y-%m-%dT%H:%M:%S{fraction}%:z")).to_string())
            }
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<i32> for Scalar {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<u32> for Scalar {
    fn from(i: u32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<Decimal> for Scalar {
    fn from(d: Decimal) -> Self {
        Self::Decimal(d)
    }
}

impl From<f64> for Scalar {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<NaiveDate> for Scalar {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<DateTime<FixedOffset>> for Scalar {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Self::DateTime(dt)
    }
}

impl From<Scalar> for FieldValue {
    fn from(s: Scalar) -> Self {
        Self::Scalar(s)
    }
}

impl From<FieldMap> for FieldValue {
    fn from(m: FieldMap) -> Self {
        Self::Map(m)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

macro_rules! scalar_field_value {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(v: $ty) -> Self {
                    Self::Scalar(Scalar::from(v))
                }
            }
        )+
    };
}

scalar_field_value!(
    &str,
    String,
    i64,
    i32,
    u32,
    Decimal,
    f64,
    NaiveDate,
    DateTime<FixedOffset>
);

/// Build a [`FieldMap`] from `key => value` pairs, in source order.
///
/// Values go through `FieldValue::from`, so strings, integers, decimals,
/// dates, nested maps and `Vec`s can be used directly.
///
/// ```
/// use fattura::field_map;
///
/// let sede = field_map! {
///     "CAP" => "00100",
///     "Comune" => "Roma",
/// };
/// assert_eq!(sede.keys().collect::<Vec<_>>(), ["CAP", "Comune"]);
/// ```
#[macro_export]
macro_rules! field_map {
    () => {
        $crate::core::FieldMap::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::core::FieldMap::new();
        $(
            map.insert(
                ::std::string::String::from($key),
                $crate::core::FieldValue::from($value),
            );
        )+
        map
    }};
}
