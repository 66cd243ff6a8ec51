//! Host field schema
//!
//! The schema describes which host fields can be filtered on and how their
//! values are typed. It is parsed once at startup and handed to the
//! resolver explicitly.

use serde::Deserialize;

use crate::config::ConfigError;

/// Value type of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Integer,
    Float,
    Boolean,
    Timestamp,
    Uuid,
    /// Plain object: children are addressed with a dotted path
    Object,
    /// Nested document: children are matched through a `nested` query
    Nested,
}

impl FieldType {
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Object | Self::Nested)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl FieldDefinition {
    pub fn child(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    fn validate(&self, parent: &str) -> Result<(), ConfigError> {
        let path = if parent.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", parent, self.name)
        };

        if self.field_type.is_container() && self.fields.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "schema field {path} has no child fields"
            )));
        }
        if !self.field_type.is_container() && !self.fields.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "schema field {path} is a scalar but declares child fields"
            )));
        }
        self.fields.iter().try_for_each(|f| f.validate(&path))
    }
}

/// The host field schema
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoreSchema {
    pub fields: Vec<FieldDefinition>,
}

impl CoreSchema {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let schema: CoreSchema = serde_yaml::from_str(content)?;
        schema.fields.iter().try_for_each(|f| f.validate(""))?;
        Ok(schema)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_schema() {
        let yaml = r#"
fields:
  - name: display_name
    type: string
  - name: system_profile_facts
    type: object
    fields:
      - name: operating_system
        type: object
        fields:
          - name: name
            type: string
          - name: major
            type: integer
"#;
        let schema = CoreSchema::from_yaml(yaml).unwrap();
        let spf = schema.field("system_profile_facts").unwrap();
        assert_eq!(spf.field_type, FieldType::Object);

        let os = spf.child("operating_system").unwrap();
        assert_eq!(os.child("major").unwrap().field_type, FieldType::Integer);
        assert!(schema.field("missing").is_none());
    }

    #[test]
    fn test_rejects_empty_object() {
        let yaml = r#"
fields:
  - name: tags
    type: nested
"#;
        let err = CoreSchema::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("tags"));
    }

    #[test]
    fn test_rejects_scalar_with_children() {
        let yaml = r#"
fields:
  - name: id
    type: uuid
    fields:
      - name: nope
        type: string
"#;
        assert!(CoreSchema::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_rejects_unknown_type() {
        let yaml = r#"
fields:
  - name: id
    type: blob
"#;
        assert!(matches!(
            CoreSchema::from_yaml(yaml),
            Err(ConfigError::Parse(_))
        ));
    }
}
