use serde::{de, Deserialize, Deserializer};
use std::fmt::Display;
use std::str::FromStr;

/// Treat a missing or empty form/query value as `None`.
pub fn empty_string_as_none<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let opt = Option::<String>::deserialize(de)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => FromStr::from_str(s).map_err(de::Error::custom).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Params {
        #[serde(default, deserialize_with = "empty_string_as_none")]
        id: Option<i64>,
    }

    #[test]
    fn test_empty_and_missing_are_none() {
        let p: Params = serde_urlencoded::from_str("id=").unwrap();
        assert_eq!(p.id, None);
        let p: Params = serde_urlencoded::from_str("").unwrap();
        assert_eq!(p.id, None);
        let p: Params = serde_urlencoded::from_str("id=42").unwrap();
        assert_eq!(p.id, Some(42));
        assert!(serde_urlencoded::from_str::<Params>("id=abc").is_err());
    }
}
