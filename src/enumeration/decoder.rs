//! Bucket key decoding
//!
//! Tags are indexed as `namespace/key=value` strings and operating systems
//! as `name||||major||||minor` script keys. These functions turn one bucket
//! key back into its structured form.

use serde::Serialize;

use crate::error::EnumerationError;

/// Joins the operating system name, major and minor version in script keys
pub const OPERATING_SYSTEM_DELIMITER: &str = "||||";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagKey {
    pub namespace: Option<String>,
    pub key: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperatingSystemKey {
    pub name: String,
    pub major: String,
    pub minor: String,
}

/// Split on the first `delimiter`
pub fn split_first(value: &str, delimiter: char) -> Result<(&str, &str), EnumerationError> {
    value
        .split_once(delimiter)
        .ok_or_else(|| EnumerationError::MalformedKey {
            key: value.to_string(),
            delimiter,
        })
}

fn non_empty(segment: &str) -> Option<String> {
    (!segment.is_empty()).then(|| segment.to_string())
}

/// Decode `namespace/key=value`
///
/// Namespaces never contain `/`. Keys are assumed not to contain `=`; a key
/// that does will be split at its first `=` and the remainder read as part
/// of the value.
pub fn decode_tag_key(raw: &str) -> Result<TagKey, EnumerationError> {
    let (namespace, rest) = split_first(raw, '/')?;
    let (key, value) = split_first(rest, '=')?;

    Ok(TagKey {
        namespace: non_empty(namespace),
        key: key.to_string(),
        value: non_empty(value),
    })
}

/// Decode `name||||major||||minor`; `None` for hosts without complete
/// operating system facts (empty key)
pub fn decode_operating_system_key(raw: &str) -> Option<OperatingSystemKey> {
    if raw.is_empty() {
        return None;
    }

    let mut segments = raw.split(OPERATING_SYSTEM_DELIMITER).map(str::to_string);
    Some(OperatingSystemKey {
        name: segments.next().unwrap_or_default(),
        major: segments.next().unwrap_or_default(),
        minor: segments.next().unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tag(namespace: Option<&str>, key: &str, value: Option<&str>) -> TagKey {
        TagKey {
            namespace: namespace.map(String::from),
            key: key.to_string(),
            value: value.map(String::from),
        }
    }

    #[test]
    fn test_full_tag() {
        assert_eq!(
            decode_tag_key("NS1/key1=val1").unwrap(),
            tag(Some("NS1"), "key1", Some("val1"))
        );
    }

    #[test]
    fn test_empty_value_is_null() {
        assert_eq!(decode_tag_key("ns/key=").unwrap(), tag(Some("ns"), "key", None));
    }

    #[test]
    fn test_empty_namespace_is_null() {
        assert_eq!(decode_tag_key("/key=val").unwrap(), tag(None, "key", Some("val")));
    }

    #[test]
    fn test_empty_key_is_kept() {
        assert_eq!(decode_tag_key("ns/=val").unwrap(), tag(Some("ns"), "", Some("val")));
        assert_eq!(decode_tag_key("/=").unwrap(), tag(None, "", None));
    }

    #[test]
    fn test_splits_on_first_delimiters() {
        assert_eq!(
            decode_tag_key("ns/key=a=b/c").unwrap(),
            tag(Some("ns"), "key", Some("a=b/c"))
        );
    }

    #[test]
    fn test_missing_slash() {
        let err = decode_tag_key("invalid").unwrap_err();
        assert!(matches!(
            err,
            EnumerationError::MalformedKey { ref key, delimiter: '/' } if key == "invalid"
        ));
        assert!(err.to_string().contains("'/'"));
    }

    #[test]
    fn test_missing_equals() {
        let err = decode_tag_key("ns/invalid").unwrap_err();
        assert!(matches!(
            err,
            EnumerationError::MalformedKey { ref key, delimiter: '=' } if key == "invalid"
        ));
        assert!(err.to_string().contains("'='"));
    }

    #[test]
    fn test_operating_system() {
        assert_eq!(
            decode_operating_system_key("RHEL||||8||||4"),
            Some(OperatingSystemKey {
                name: "RHEL".into(),
                major: "8".into(),
                minor: "4".into(),
            })
        );
    }

    #[test]
    fn test_operating_system_empty_key_dropped() {
        assert_eq!(decode_operating_system_key(""), None);
    }

    #[test]
    fn test_operating_system_takes_first_three_segments() {
        let os = decode_operating_system_key("CentOS Linux||||7||||9||||extra").unwrap();
        assert_eq!((os.name.as_str(), os.major.as_str(), os.minor.as_str()), ("CentOS Linux", "7", "9"));

        let short = decode_operating_system_key("RHEL||||8").unwrap();
        assert_eq!(short.minor, "");
    }

    proptest! {
        #[test]
        fn prop_tag_round_trip(
            namespace in "[a-zA-Z0-9_.-]{1,12}",
            key in "[a-zA-Z0-9_ .-]{0,12}",
            value in "[a-zA-Z0-9_=/ .-]{0,16}",
        ) {
            let decoded = decode_tag_key(&format!("{namespace}/{key}={value}")).unwrap();
            prop_assert_eq!(decoded.namespace, Some(namespace));
            prop_assert_eq!(decoded.key, key);
            prop_assert_eq!(decoded.value, (!value.is_empty()).then_some(value));
        }
    }
}
