use serde::{de, Deserialize, Deserializer};
use serde_aux::field_attributes::deserialize_option_number_from_string;

// missing, null and "" all count as "not provided"
pub fn deserialize_non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_empty()))
}

// clients send numbers both as JSON numbers and as strings; 0 counts as "not provided"
pub fn deserialize_non_zero_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<f64> = deserialize_option_number_from_string(deserializer)?;
    match value {
        Some(v) if !v.is_finite() => Err(de::Error::custom("number must be finite")),
        Some(v) if v == 0.0 => Ok(None),
        other => Ok(other),
    }
}
