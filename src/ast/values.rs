use std::{borrow::Cow, fmt};

/// A value we must parameterize for the prepared statement. Null values are
/// expressed by the corresponding type variant holding `None`, so the type of
/// the parameter survives even when there is no data.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// 32-bit signed integer.
    Int32(Option<i32>),
    /// 64-bit signed integer.
    Int64(Option<i64>),
    /// 32-bit floating point.
    Float(Option<f32>),
    /// 64-bit floating point.
    Double(Option<f64>),
    /// String value.
    Text(Option<Cow<'a, str>>),
    /// Bytes value.
    Bytes(Option<Cow<'a, [u8]>>),
    /// Boolean value.
    Boolean(Option<bool>),
    /// A JSON value.
    Json(Option<serde_json::Value>),
}

pub(crate) struct Params<'a>(pub(crate) &'a [Value<'a>]);

impl fmt::Display for Params<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.0.len();

        write!(f, "[")?;
        for (i, val) in self.0.iter().enumerate() {
            write!(f, "{val}")?;

            if i < (len - 1) {
                write!(f, ",")?;
            }
        }
        write!(f, "]")
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let res = match self {
            Value::Int32(val) => val.map(|v| write!(f, "{v}")),
            Value::Int64(val) => val.map(|v| write!(f, "{v}")),
            Value::Float(val) => val.map(|v| write!(f, "{v}")),
            Value::Double(val) => val.map(|v| write!(f, "{v}")),
            Value::Text(val) => val.as_ref().map(|v| write!(f, "\"{v}\"")),
            Value::Bytes(val) => val.as_ref().map(|v| write!(f, "<{} bytes blob>", v.len())),
            Value::Boolean(val) => val.map(|v| write!(f, "{v}")),
            Value::Json(val) => val.as_ref().map(|v| write!(f, "{v}")),
        };

        match res {
            Some(r) => r,
            None => write!(f, "null"),
        }
    }
}

impl<'a> Value<'a> {
    /// Creates a new string value.
    pub fn text<T>(value: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        Value::Text(Some(value.into()))
    }

    /// Creates a new bytes value.
    pub fn bytes<B>(value: B) -> Self
    where
        B: Into<Cow<'a, [u8]>>,
    {
        Value::Bytes(Some(value.into()))
    }

    /// `true` if the `Value` is null.
    pub fn is_null(&self) -> bool {
        match self {
            Value::Int32(i) => i.is_none(),
            Value::Int64(i) => i.is_none(),
            Value::Float(i) => i.is_none(),
            Value::Double(i) => i.is_none(),
            Value::Text(t) => t.is_none(),
            Value::Bytes(b) => b.is_none(),
            Value::Boolean(b) => b.is_none(),
            Value::Json(json) => json.is_none(),
        }
    }

    /// Returns a `&str` if the value is text, otherwise `None`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(Some(cow)) => Some(cow.as_ref()),
            _ => None,
        }
    }

    /// Returns an `i64` if the value is an integer, otherwise `None`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int32(i) => i.map(i64::from),
            Value::Int64(i) => *i,
            _ => None,
        }
    }

    /// Returns an `i32` if the value is an integer that fits, otherwise `None`.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int32(i) => *i,
            Value::Int64(i) => i.and_then(|i| i32::try_from(i).ok()),
            _ => None,
        }
    }

    /// Detaches the value from any borrowed data.
    pub fn into_owned(self) -> Value<'static> {
        match self {
            Value::Int32(i) => Value::Int32(i),
            Value::Int64(i) => Value::Int64(i),
            Value::Float(f) => Value::Float(f),
            Value::Double(f) => Value::Double(f),
            Value::Text(t) => Value::Text(t.map(|t| Cow::Owned(t.into_owned()))),
            Value::Bytes(b) => Value::Bytes(b.map(|b| Cow::Owned(b.into_owned()))),
            Value::Boolean(b) => Value::Boolean(b),
            Value::Json(j) => Value::Json(j),
        }
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(that: &'a str) -> Self {
        Value::text(that)
    }
}

impl<'a> From<String> for Value<'a> {
    fn from(that: String) -> Self {
        Value::text(that)
    }
}

impl<'a> From<Cow<'a, str>> for Value<'a> {
    fn from(that: Cow<'a, str>) -> Self {
        Value::Text(Some(that))
    }
}

impl<'a> From<&'a [u8]> for Value<'a> {
    fn from(that: &'a [u8]) -> Self {
        Value::bytes(that)
    }
}

impl<'a> From<Vec<u8>> for Value<'a> {
    fn from(that: Vec<u8>) -> Self {
        Value::bytes(that)
    }
}

impl<'a> From<i32> for Value<'a> {
    fn from(that: i32) -> Self {
        Value::Int32(Some(that))
    }
}

impl<'a> From<i64> for Value<'a> {
    fn from(that: i64) -> Self {
        Value::Int64(Some(that))
    }
}

impl<'a> From<f32> for Value<'a> {
    fn from(that: f32) -> Self {
        Value::Float(Some(that))
    }
}

impl<'a> From<f64> for Value<'a> {
    fn from(that: f64) -> Self {
        Value::Double(Some(that))
    }
}

impl<'a> From<bool> for Value<'a> {
    fn from(that: bool) -> Self {
        Value::Boolean(Some(that))
    }
}

impl<'a> From<serde_json::Value> for Value<'a> {
    fn from(that: serde_json::Value) -> Self {
        Value::Json(Some(that))
    }
}

impl<'a, T> From<Option<T>> for Value<'a>
where
    T: Into<Value<'a>>,
{
    /// `None` becomes a typeless SQL `NULL`, bound as text.
    fn from(that: Option<T>) -> Self {
        match that {
            Some(value) => value.into(),
            None => Value::Text(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_values_display_as_null() {
        assert_eq!("null", Value::Int64(None).to_string());
        assert_eq!("null", Value::from(None::<&str>).to_string());
    }

    #[test]
    fn params_display_as_a_list() {
        let params = [Value::from("baz"), Value::from(1), Value::from(true)];
        assert_eq!("[\"baz\",1,true]", Params(&params).to_string());
    }

    #[test]
    fn integers_widen_and_narrow() {
        assert_eq!(Some(7), Value::from(7).as_i64());
        assert_eq!(Some(7), Value::from(7i64).as_i32());
        assert_eq!(None, Value::from(i64::MAX).as_i32());
        assert_eq!(None, Value::from("7").as_i64());
    }

    #[test]
    fn into_owned_keeps_the_data() {
        let text = String::from("borrowed");
        let value = Value::from(text.as_str()).into_owned();

        assert_eq!(Some("borrowed"), value.as_str());
    }
}
