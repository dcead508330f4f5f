//! Schema type definitions
//!
//! Supported field types:
//! - float: any JSON number
//! - int: integral JSON number only
//!
//! Every field carries an inclusive `[min, max]` range.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Feature columns of the diabetes classifier, in model input order.
pub const DIABETES_FEATURES: [&str; 8] = [
    "Pregnancies",
    "Glucose",
    "BloodPressure",
    "SkinThickness",
    "Insulin",
    "BMI",
    "DiabetesPedigreeFunction",
    "Age",
];

/// Expected numeric type marker of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// 64-bit floating point; integers are accepted
    Float,
    /// 64-bit signed integer; fractional numbers are rejected
    Int,
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Float => "float",
            FieldType::Int => "int",
        }
    }

    /// Whether a non-null value is representable as this type.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldType::Float => value.is_number(),
            FieldType::Int => value.is_i64() || value.is_u64(),
        }
    }
}

/// Field definition: name, type and inclusive range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub min: f64,
    pub max: f64,
}

impl FieldDef {
    /// Create a float field with an inclusive range
    pub fn float(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::Float,
            min,
            max,
        }
    }

    /// Create an int field with an inclusive range
    pub fn int(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::Int,
            min,
            max,
        }
    }

    /// Whether `value` lies within `[min, max]`.
    pub fn in_range(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Range rendered for messages, e.g. `[0, 120]`.
    pub fn range_label(&self) -> String {
        format!("[{}, {}]", self.min, self.max)
    }
}

/// Complete schema definition. Field order is significant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Unique schema identifier
    pub schema_id: String,
    /// Schema version
    pub schema_version: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Field definitions in order
    pub fields: Vec<FieldDef>,
}

impl Schema {
    /// Create a new schema
    pub fn new(
        schema_id: impl Into<String>,
        schema_version: impl Into<String>,
        fields: Vec<FieldDef>,
    ) -> Self {
        Self {
            schema_id: schema_id.into(),
            schema_version: schema_version.into(),
            description: None,
            fields,
        }
    }

    /// Schema for the eight diabetes features with their plausible ranges.
    pub fn diabetes() -> Self {
        let ranges: [(f64, f64); 8] = [
            (0.0, 30.0),
            (0.0, 300.0),
            (0.0, 200.0),
            (0.0, 100.0),
            (0.0, 1000.0),
            (0.0, 70.0),
            (0.0, 3.0),
            (0.0, 120.0),
        ];
        let fields = DIABETES_FEATURES
            .iter()
            .zip(ranges)
            .map(|(name, (min, max))| FieldDef::float(*name, min, max))
            .collect();

        let mut schema = Self::new("diabetes", "v1", fields);
        schema.description = Some("Pima diabetes classifier input features".into());
        schema
    }

    /// Returns the unique key for this schema (id, version)
    pub fn key(&self) -> (&str, &str) {
        (&self.schema_id, &self.schema_version)
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Field names in schema order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Validates the schema structure itself (not a batch)
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.fields.is_empty() {
            return Err("Schema must define at least one field".into());
        }

        for (i, field) in self.fields.iter().enumerate() {
            if field.name.is_empty() {
                return Err(format!("Field #{} has an empty name", i));
            }
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(format!("Field '{}' is declared twice", field.name));
            }
            if !field.min.is_finite() || !field.max.is_finite() {
                return Err(format!("Field '{}' range must be finite", field.name));
            }
            if field.min > field.max {
                return Err(format!(
                    "Field '{}' has min {} greater than max {}",
                    field.name, field.min, field.max
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_diabetes_schema_is_valid() {
        let schema = Schema::diabetes();
        assert!(schema.validate_structure().is_ok());
        assert_eq!(schema.fields.len(), 8);
        assert_eq!(schema.field("Age").unwrap().max, 120.0);
        assert_eq!(schema.field("DiabetesPedigreeFunction").unwrap().max, 3.0);
    }

    #[test]
    fn test_field_order_preserved() {
        let schema = Schema::diabetes();
        let names: Vec<&str> = schema.field_names().collect();
        assert_eq!(names, DIABETES_FEATURES.to_vec());
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let schema = Schema::new(
            "dup",
            "v1",
            vec![FieldDef::float("Age", 0.0, 1.0), FieldDef::float("Age", 0.0, 2.0)],
        );
        let err = schema.validate_structure().unwrap_err();
        assert!(err.contains("twice"));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let schema = Schema::new("bad", "v1", vec![FieldDef::float("BMI", 70.0, 0.0)]);
        assert!(schema.validate_structure().is_err());
    }

    #[test]
    fn test_empty_schema_rejected() {
        let schema = Schema::new("empty", "v1", vec![]);
        assert!(schema.validate_structure().is_err());
    }

    #[test]
    fn test_type_acceptance() {
        assert!(FieldType::Float.accepts(&json!(1)));
        assert!(FieldType::Float.accepts(&json!(1.5)));
        assert!(FieldType::Int.accepts(&json!(3)));
        assert!(!FieldType::Int.accepts(&json!(3.5)));
        assert!(!FieldType::Float.accepts(&json!("3")));
        assert!(!FieldType::Float.accepts(&json!(true)));
    }

    #[test]
    fn test_range_is_inclusive() {
        let age = FieldDef::int("Age", 0.0, 120.0);
        assert!(age.in_range(0.0));
        assert!(age.in_range(120.0));
        assert!(!age.in_range(150.0));
        assert!(!age.in_range(-1.0));
    }

    #[test]
    fn test_schema_json_shape() {
        let schema: Schema = serde_json::from_value(json!({
            "schema_id": "s",
            "schema_version": "v2",
            "fields": [{"name": "Age", "type": "int", "min": 0, "max": 120}]
        }))
        .unwrap();
        assert_eq!(schema.fields[0].field_type, FieldType::Int);
        assert_eq!(schema.key(), ("s", "v2"));
    }
}
