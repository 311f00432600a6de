use crate::{
    ast::Value,
    error::{Error, ErrorKind},
};
use bytes::BytesMut;
use postgres_types::{FromSql, IsNull, ToSql, Type as PostgresType, to_sql_checked};
use std::{borrow::Cow, error::Error as StdError};
use tokio_postgres::Row as PostgresRow;
use uuid::Uuid;

pub(crate) fn conv_params<'a>(params: &'a [Value<'a>]) -> Vec<&'a (dyn ToSql + Sync)> {
    params.iter().map(|x| x as &(dyn ToSql + Sync)).collect::<Vec<_>>()
}

fn read<'a, T>(row: &'a PostgresRow) -> crate::Result<T>
where
    T: FromSql<'a>,
{
    row.try_get(0)
        .map_err(|e| Error::builder(ErrorKind::ColumnReadFailure(Box::new(e))).build())
}

/// Reads the first column of the row into a `Value`.
pub(crate) fn first_column(row: &PostgresRow) -> crate::Result<Value<'static>> {
    let column = match row.columns().first() {
        Some(column) => column,
        None => {
            let kind = ErrorKind::conversion("The statement returned a row without columns.");
            return Err(Error::builder(kind).build());
        }
    };

    let value = match *column.type_() {
        PostgresType::BOOL => Value::Boolean(read(row)?),
        PostgresType::INT2 => {
            let val: Option<i16> = read(row)?;
            Value::Int32(val.map(i32::from))
        }
        PostgresType::INT4 => Value::Int32(read(row)?),
        PostgresType::INT8 => Value::Int64(read(row)?),
        PostgresType::OID => {
            let val: Option<u32> = read(row)?;
            Value::Int64(val.map(i64::from))
        }
        PostgresType::FLOAT4 => Value::Float(read(row)?),
        PostgresType::FLOAT8 => Value::Double(read(row)?),
        PostgresType::TEXT | PostgresType::VARCHAR | PostgresType::NAME | PostgresType::BPCHAR => {
            let val: Option<String> = read(row)?;
            Value::Text(val.map(Cow::Owned))
        }
        PostgresType::UUID => {
            let val: Option<Uuid> = read(row)?;
            Value::Text(val.map(|uuid| Cow::Owned(uuid.to_string())))
        }
        PostgresType::BYTEA => {
            let val: Option<Vec<u8>> = read(row)?;
            Value::Bytes(val.map(Cow::Owned))
        }
        PostgresType::JSON | PostgresType::JSONB => Value::Json(read(row)?),
        ref other => {
            let kind = ErrorKind::conversion(format!(
                "Couldn't read the identifier column `{}` of type `{}`.",
                column.name(),
                other.name()
            ));

            return Err(Error::builder(kind).build());
        }
    };

    Ok(value)
}

fn unsupported(value: &Value<'_>, ty: &PostgresType) -> Box<dyn StdError + Send + Sync> {
    let kind = ErrorKind::conversion(format!("Couldn't bind `{value}` to a parameter of type `{ty}`."));
    Box::new(Error::builder(kind).build())
}

/// Values are encoded to the type the server expects for the parameter.
/// Integers widen, narrow or turn into floats; a value with no lossless
/// encoding for the type is an error instead of a misread byte sequence.
impl ToSql for Value<'_> {
    fn to_sql(&self, ty: &PostgresType, out: &mut BytesMut) -> Result<IsNull, Box<dyn StdError + Send + Sync>> {
        if self.is_null() {
            return Ok(IsNull::Yes);
        }

        match (self, ty) {
            (Value::Int32(Some(integer)), &PostgresType::INT2) => i16::try_from(*integer)?.to_sql(ty, out),
            (Value::Int32(Some(integer)), &PostgresType::INT4) => integer.to_sql(ty, out),
            (Value::Int32(Some(integer)), &PostgresType::INT8) => i64::from(*integer).to_sql(ty, out),
            (Value::Int32(Some(integer)), &PostgresType::OID) => u32::try_from(*integer)?.to_sql(ty, out),
            (Value::Int32(Some(integer)), &PostgresType::FLOAT4) => (*integer as f32).to_sql(ty, out),
            (Value::Int32(Some(integer)), &PostgresType::FLOAT8) => f64::from(*integer).to_sql(ty, out),
            (Value::Int32(Some(integer)), &PostgresType::TEXT) => integer.to_string().to_sql(ty, out),
            (Value::Int64(Some(integer)), &PostgresType::INT2) => i16::try_from(*integer)?.to_sql(ty, out),
            (Value::Int64(Some(integer)), &PostgresType::INT4) => i32::try_from(*integer)?.to_sql(ty, out),
            (Value::Int64(Some(integer)), &PostgresType::INT8) => integer.to_sql(ty, out),
            (Value::Int64(Some(integer)), &PostgresType::OID) => u32::try_from(*integer)?.to_sql(ty, out),
            (Value::Int64(Some(integer)), &PostgresType::FLOAT4) => (*integer as f32).to_sql(ty, out),
            (Value::Int64(Some(integer)), &PostgresType::FLOAT8) => (*integer as f64).to_sql(ty, out),
            (Value::Int64(Some(integer)), &PostgresType::TEXT) => integer.to_string().to_sql(ty, out),
            (Value::Float(Some(float)), &PostgresType::FLOAT4) => float.to_sql(ty, out),
            (Value::Float(Some(float)), &PostgresType::FLOAT8) => f64::from(*float).to_sql(ty, out),
            (Value::Double(Some(double)), &PostgresType::FLOAT4) => (*double as f32).to_sql(ty, out),
            (Value::Double(Some(double)), &PostgresType::FLOAT8) => double.to_sql(ty, out),
            (Value::Text(Some(string)), &PostgresType::UUID) => {
                let parsed_uuid: Uuid = string.parse()?;
                parsed_uuid.to_sql(ty, out)
            }
            (Value::Text(Some(string)), _) if <&str as ToSql>::accepts(ty) => {
                let string: &str = string;
                string.to_sql(ty, out)
            }
            (Value::Bytes(Some(bytes)), _) if <&[u8] as ToSql>::accepts(ty) => {
                let bytes: &[u8] = bytes;
                bytes.to_sql(ty, out)
            }
            (Value::Boolean(Some(boo)), &PostgresType::BOOL) => boo.to_sql(ty, out),
            (Value::Json(Some(json)), _) if <serde_json::Value as ToSql>::accepts(ty) => json.to_sql(ty, out),
            (value, ty) => Err(unsupported(value, ty)),
        }
    }

    fn accepts(_: &PostgresType) -> bool {
        true
    }

    to_sql_checked!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::NamedValueBindings;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn encode(value: Value<'_>, ty: &PostgresType) -> BytesMut {
        let mut out = BytesMut::new();
        let is_null = value.to_sql_checked(ty, &mut out).unwrap();

        assert!(matches!(is_null, IsNull::No));
        out
    }

    fn decode<'a, T: FromSql<'a>>(ty: &PostgresType, raw: &'a BytesMut) -> T {
        T::from_sql(ty, raw).unwrap()
    }

    fn rejects(value: Value<'_>, ty: &PostgresType) -> bool {
        value.to_sql_checked(ty, &mut BytesMut::new()).is_err()
    }

    #[test]
    fn null_values_encode_as_null_for_any_type() {
        for ty in [PostgresType::TEXT, PostgresType::FLOAT8, PostgresType::NUMERIC, PostgresType::JSONB] {
            let mut out = BytesMut::new();
            let is_null = Value::Int64(None).to_sql_checked(&ty, &mut out).unwrap();

            assert!(matches!(is_null, IsNull::Yes));
            assert!(out.is_empty());
        }
    }

    #[test]
    fn int32_follows_the_parameter_type() {
        assert_eq!(7i16, decode::<i16>(&PostgresType::INT2, &encode(Value::from(7), &PostgresType::INT2)));
        assert_eq!(7i32, decode::<i32>(&PostgresType::INT4, &encode(Value::from(7), &PostgresType::INT4)));
        assert_eq!(7i64, decode::<i64>(&PostgresType::INT8, &encode(Value::from(7), &PostgresType::INT8)));
        assert_eq!(7u32, decode::<u32>(&PostgresType::OID, &encode(Value::from(7), &PostgresType::OID)));
        assert_eq!(7f32, decode::<f32>(&PostgresType::FLOAT4, &encode(Value::from(7), &PostgresType::FLOAT4)));
        assert_eq!(7f64, decode::<f64>(&PostgresType::FLOAT8, &encode(Value::from(7), &PostgresType::FLOAT8)));

        let text = decode::<String>(&PostgresType::TEXT, &encode(Value::from(7), &PostgresType::TEXT));
        assert_eq!("7", text);
    }

    #[test]
    fn int64_follows_the_parameter_type() {
        assert_eq!(7i16, decode::<i16>(&PostgresType::INT2, &encode(Value::from(7i64), &PostgresType::INT2)));
        assert_eq!(7i32, decode::<i32>(&PostgresType::INT4, &encode(Value::from(7i64), &PostgresType::INT4)));
        assert_eq!(7i64, decode::<i64>(&PostgresType::INT8, &encode(Value::from(7i64), &PostgresType::INT8)));
        assert_eq!(7u32, decode::<u32>(&PostgresType::OID, &encode(Value::from(7i64), &PostgresType::OID)));
        assert_eq!(7f32, decode::<f32>(&PostgresType::FLOAT4, &encode(Value::from(7i64), &PostgresType::FLOAT4)));
        assert_eq!(7f64, decode::<f64>(&PostgresType::FLOAT8, &encode(Value::from(7i64), &PostgresType::FLOAT8)));

        let text = decode::<String>(&PostgresType::TEXT, &encode(Value::from(7i64), &PostgresType::TEXT));
        assert_eq!("7", text);
    }

    #[test]
    fn json_numbers_bound_to_float_columns_keep_their_value() {
        let bindings = match json!({ "price": 10 }) {
            serde_json::Value::Object(map) => NamedValueBindings::from(map),
            _ => unreachable!(),
        };

        let value = bindings.get("price").flatten().cloned().unwrap();
        assert_eq!(Value::Int64(Some(10)), value);

        let raw = encode(value, &PostgresType::FLOAT8);
        assert_eq!(10.0f64, decode::<f64>(&PostgresType::FLOAT8, &raw));
    }

    #[test]
    fn out_of_range_integers_are_rejected() {
        assert!(rejects(Value::from(i64::MAX), &PostgresType::INT2));
        assert!(rejects(Value::from(i64::MAX), &PostgresType::INT4));
        assert!(rejects(Value::from(-1), &PostgresType::OID));
        assert!(rejects(Value::from(i32::MAX), &PostgresType::INT2));
    }

    #[test]
    fn floats_follow_the_parameter_type() {
        assert_eq!(0.5f32, decode::<f32>(&PostgresType::FLOAT4, &encode(Value::from(0.5f32), &PostgresType::FLOAT4)));
        assert_eq!(0.5f64, decode::<f64>(&PostgresType::FLOAT8, &encode(Value::from(0.5f32), &PostgresType::FLOAT8)));
        assert_eq!(0.5f32, decode::<f32>(&PostgresType::FLOAT4, &encode(Value::from(0.5), &PostgresType::FLOAT4)));
        assert_eq!(0.5f64, decode::<f64>(&PostgresType::FLOAT8, &encode(Value::from(0.5), &PostgresType::FLOAT8)));
    }

    #[test]
    fn text_binds_to_string_types() {
        for ty in [PostgresType::TEXT, PostgresType::VARCHAR, PostgresType::BPCHAR, PostgresType::NAME] {
            let text = decode::<String>(&ty, &encode(Value::from("baz"), &ty));
            assert_eq!("baz", text);
        }
    }

    #[test]
    fn text_is_parsed_for_uuid_columns() {
        let uuid = Uuid::new_v4();
        let raw = encode(Value::text(uuid.to_string()), &PostgresType::UUID);

        assert_eq!(uuid, decode::<Uuid>(&PostgresType::UUID, &raw));
        assert!(rejects(Value::from("not-a-uuid"), &PostgresType::UUID));
    }

    #[test]
    fn bytes_booleans_and_json_bind_to_their_types() {
        let raw = encode(Value::bytes(vec![1u8, 2, 3]), &PostgresType::BYTEA);
        assert_eq!(vec![1u8, 2, 3], decode::<Vec<u8>>(&PostgresType::BYTEA, &raw));

        let raw = encode(Value::from(true), &PostgresType::BOOL);
        assert!(decode::<bool>(&PostgresType::BOOL, &raw));

        for ty in [PostgresType::JSON, PostgresType::JSONB] {
            let raw = encode(Value::from(json!({ "color": "blue" })), &ty);
            assert_eq!(json!({ "color": "blue" }), decode::<serde_json::Value>(&ty, &raw));
        }
    }

    #[test]
    fn values_without_an_encoding_for_the_type_are_rejected() {
        assert!(rejects(Value::from(10), &PostgresType::NUMERIC));
        assert!(rejects(Value::from(10i64), &PostgresType::NUMERIC));
        assert!(rejects(Value::from(0.5), &PostgresType::NUMERIC));
        assert!(rejects(Value::from(0.5), &PostgresType::INT4));
        assert!(rejects(Value::from("10"), &PostgresType::INT4));
        assert!(rejects(Value::from(true), &PostgresType::INT4));
        assert!(rejects(Value::bytes(vec![1u8]), &PostgresType::TEXT));
        assert!(rejects(Value::from(json!(1)), &PostgresType::TEXT));
    }

    #[test]
    fn rejections_name_the_value_and_type() {
        let err = Value::from(10i64).to_sql(&PostgresType::NUMERIC, &mut BytesMut::new()).err().expect("conversion should fail");
        assert_eq!("Conversion failed: Couldn't bind `10` to a parameter of type `numeric`.", err.to_string());
    }
}
