use std::fmt;

use serde::de;

/// ids are sent either as json integers or as strings holding an integer
/// depending on the server version
struct IntIdVisitor;

impl<'de> de::Visitor<'de> for IntIdVisitor {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "an integer id or a string containing an integer id")
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(v)
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        i64::try_from(v).map_err(|_|
            E::invalid_value(de::Unexpected::Unsigned(v), &self)
        )
    }

    fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        s.trim().parse().map_err(|_|
            E::invalid_value(de::Unexpected::Str(s), &self)
        )
    }
}

pub mod int_id {
    use serde::{ser, de};

    use super::IntIdVisitor;

    pub fn serialize<S>(id: &i64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer
    {
        serializer.serialize_i64(*id)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: de::Deserializer<'de>
    {
        deserializer.deserialize_any(IntIdVisitor)
    }
}

/// reads an explicit null the same as a missing field. pair with
/// `#[serde(default)]`
pub fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: de::Deserializer<'de>,
    T: de::Deserialize<'de> + Default,
{
    Ok(<Option<T> as de::Deserialize>::deserialize(deserializer)?.unwrap_or_default())
}
