use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;

/// Nullable 16-bit integer column.
///
/// Encodes as a JSON number when a value is held and as `null` otherwise.
/// Field absence on the wire is tracked separately by the payload extractor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ToSchema)]
pub struct NullInt16(pub Option<i16>);

impl NullInt16 {
    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }

    pub fn get(&self) -> Option<i16> {
        self.0
    }
}

impl From<i16> for NullInt16 {
    fn from(v: i16) -> Self {
        NullInt16(Some(v))
    }
}

impl From<Option<i16>> for NullInt16 {
    fn from(v: Option<i16>) -> Self {
        NullInt16(v)
    }
}

impl Serialize for NullInt16 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Some(v) => serializer.serialize_i16(v),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for NullInt16 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<i16>::deserialize(deserializer).map(NullInt16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_decodes_to_absent_value_and_back() {
        let v: NullInt16 = serde_json::from_value(json!(null)).unwrap();
        assert!(v.is_null());
        assert_eq!(serde_json::to_value(v).unwrap(), json!(null));
    }

    #[test]
    fn integer_round_trips_exactly() {
        let v: NullInt16 = serde_json::from_str("-7").unwrap();
        assert_eq!(v.get(), Some(-7));
        assert_eq!(serde_json::to_string(&v).unwrap(), "-7");
    }

    #[test]
    fn out_of_range_is_rejected() {
        assert!(serde_json::from_str::<NullInt16>("40000").is_err());
        assert!(serde_json::from_str::<NullInt16>("\"3\"").is_err());
    }
}
