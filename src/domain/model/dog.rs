use super::{ColumnKind, ColumnValue, FieldDef, NullInt16, Record};
use crate::domain::validate::{Validator, Violation};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use utoipa::ToSchema;

/// Seed records with ids below this value cannot be deleted.
pub const PROTECTED_ID_CEILING: i64 = 4;

const DOG_FIELDS: &[FieldDef] = &[
    FieldDef::new("id", "id", ColumnKind::Integer).primary_key(),
    FieldDef::new("name", "name", ColumnKind::Text),
    FieldDef::new("breed", "breed", ColumnKind::Text),
    FieldDef::new("age", "age", ColumnKind::Integer).nullable(),
    FieldDef::new("isGoodBoy", "is_good_boy", ColumnKind::Boolean),
];

/// A dog record.
///
/// Absent wire fields decode to their defaults so a partial payload still
/// yields a complete in-memory record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Dog {
    pub id: i64,
    pub name: String,
    pub breed: String,
    pub age: NullInt16,
    #[serde(rename = "isGoodBoy")]
    pub is_good_boy: bool,
}

impl Dog {
    pub fn new(name: &str, breed: &str, age: Option<i16>, is_good_boy: bool) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            breed: breed.to_string(),
            age: age.into(),
            is_good_boy,
        }
    }

    /// Reference data inserted into an empty table at startup.
    pub fn seed() -> Vec<Dog> {
        vec![
            Dog::new("Ricky", "Chihuahua", Some(2), false),
            Dog::new("Adam", "Pug", None, true),
            Dog::new("Justin", "Poodle", Some(3), false),
        ]
    }
}

impl<'r> FromRow<'r, SqliteRow> for Dog {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            breed: row.try_get("breed")?,
            age: row.try_get::<Option<i16>, _>("age")?.into(),
            is_good_boy: row.try_get("is_good_boy")?,
        })
    }
}

impl Record for Dog {
    fn table_name() -> &'static str {
        "dogs"
    }

    fn fields() -> &'static [FieldDef] {
        DOG_FIELDS
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn column_value(&self, column: &str) -> Option<ColumnValue> {
        let v = match column {
            "id" => ColumnValue::Integer(self.id),
            "name" => ColumnValue::Text(self.name.clone()),
            "breed" => ColumnValue::Text(self.breed.clone()),
            "age" => match self.age.get() {
                Some(age) => ColumnValue::Integer(i64::from(age)),
                None => ColumnValue::Null,
            },
            "is_good_boy" => ColumnValue::Boolean(self.is_good_boy),
            _ => return None,
        };
        Some(v)
    }

    fn is_protected(id: i64) -> bool {
        id < PROTECTED_ID_CEILING
    }

    fn validate(&self) -> Result<(), Vec<Violation>> {
        Validator::new()
            .required("name", &self.name)
            .length("name", &self.name, 3, 32)
            .required("breed", &self.breed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn partial_payload_decodes_with_defaults() {
        let dog: Dog = serde_json::from_value(json!({ "name": "Rex" })).unwrap();
        assert_eq!(dog.name, "Rex");
        assert_eq!(dog.breed, "");
        assert!(dog.age.is_null());
        assert!(!dog.is_good_boy);
    }

    #[test]
    fn wire_names_follow_field_table() {
        let dog = Dog::new("Rex", "Lab", Some(3), true);
        let v = serde_json::to_value(&dog).unwrap();
        for f in Dog::fields() {
            assert!(v.get(f.wire).is_some(), "missing wire field {}", f.wire);
            assert!(dog.column_value(f.column).is_some());
        }
        assert_eq!(v["isGoodBoy"], json!(true));
    }

    #[test]
    fn null_age_binds_as_null() {
        let dog = Dog::new("Adam", "Pug", None, true);
        assert_eq!(dog.column_value("age"), Some(ColumnValue::Null));
        assert_eq!(dog.column_value("nope"), None);
    }

    #[test]
    fn seed_keeps_null_age() {
        let seed = Dog::seed();
        assert_eq!(seed[0].age, NullInt16::from(2));
        assert!(seed[1].age.is_null());
        assert_eq!(Dog::new("Rex", "Lab", Some(5), true).age.get(), Some(5));
    }

    #[test]
    fn protected_range_is_below_four() {
        assert!(Dog::is_protected(1));
        assert!(Dog::is_protected(3));
        assert!(!Dog::is_protected(4));
    }

    #[test]
    fn validation_reports_all_fields() {
        let errors = Dog::new("Al", "", None, false).validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "name");
        assert_eq!(errors[0].rule, "min");
        assert_eq!(errors[1].field, "breed");
    }
}
