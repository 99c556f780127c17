use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Highest star rating a testimonial can carry.
pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceItem {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    /// Image reference, rendered by the host.
    #[serde(deserialize_with = "lenient::string")]
    pub icon: String,
}

impl ServiceItem {
    pub fn new(name: &str, icon: &str) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    #[serde(deserialize_with = "lenient::string")]
    pub college: String,
    #[serde(deserialize_with = "lenient::string")]
    pub activity: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Testimonial {
    #[serde(deserialize_with = "lenient::string")]
    pub quote: String,
    #[serde(deserialize_with = "lenient::string")]
    pub author: String,
    #[serde(deserialize_with = "lenient::u32")]
    pub age: u32,
    #[serde(deserialize_with = "lenient::string")]
    pub condition: String,
    #[serde(deserialize_with = "lenient::rating")]
    pub rating: u8,
}

/// Shared doctor profile document.
///
/// Every field is optional and decoded on its own: a field with the wrong
/// shape is dropped (and logged) without discarding the rest of the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<Vec<EducationEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hospitals: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificates: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<ServiceItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub testimonials: Option<Vec<Testimonial>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_rating: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_reviews: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_rate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patients: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_src: Option<String>,
}

impl ProfileRecord {
    /// Decode every known field from a JSON object.
    pub fn from_object(map: &Map<String, Value>) -> Self {
        Self {
            about_text: field::<lenient::Text>(map, &["aboutText", "biography"]).map(|t| t.0),
            education: field(map, &["education"]),
            hospitals: field::<Vec<lenient::Text>>(map, &["hospitals"]).map(lenient::texts),
            certificates: field::<Vec<lenient::Text>>(map, &["certificates"]).map(lenient::texts),
            languages: field::<Vec<lenient::Text>>(map, &["languages"]).map(lenient::texts),
            services: field(map, &["services"]),
            conditions: field::<Vec<lenient::Text>>(map, &["conditions"]).map(lenient::texts),
            testimonials: field(map, &["testimonials"]),
            overall_rating: field::<lenient::Float>(map, &["overallRating"]).map(|f| f.0),
            total_reviews: field::<lenient::Count>(map, &["totalReviews"]).map(|c| c.0),
            recommended_rate: field::<lenient::Count>(map, &["recommendedRate"]).map(|c| c.0),
            doctor_name: field::<lenient::Text>(map, &["doctorName"]).map(|t| t.0),
            specialty: field::<lenient::Text>(map, &["specialty"]).map(|t| t.0),
            patients: field::<lenient::Text>(map, &["patients"]).map(|t| t.0),
            experience: field::<lenient::Text>(map, &["experience"]).map(|t| t.0),
            rating: field::<lenient::Text>(map, &["rating"]).map(|t| t.0),
            image_src: field::<lenient::Text>(map, &["imageSrc"]).map(|t| t.0),
        }
    }

    /// Number of populated fields, used by the diagnostics panel.
    pub fn populated_fields(&self) -> usize {
        [
            self.about_text.is_some(),
            self.education.is_some(),
            self.hospitals.is_some(),
            self.certificates.is_some(),
            self.languages.is_some(),
            self.services.is_some(),
            self.conditions.is_some(),
            self.testimonials.is_some(),
            self.overall_rating.is_some(),
            self.total_reviews.is_some(),
            self.recommended_rate.is_some(),
            self.doctor_name.is_some(),
            self.specialty.is_some(),
            self.patients.is_some(),
            self.experience.is_some(),
            self.rating.is_some(),
            self.image_src.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.populated_fields() == 0
    }
}

impl<'de> Deserialize<'de> for ProfileRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Object(map) => Ok(Self::from_object(&map)),
            other => Err(D::Error::custom(format!(
                "profile record must be a JSON object, found {}",
                kind_of(&other)
            ))),
        }
    }
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Missing and `null` fields are absent. Fields that fail to decode are
/// treated as absent too.
fn field<T: DeserializeOwned>(map: &Map<String, Value>, keys: &[&str]) -> Option<T> {
    let (key, value) = keys
        .iter()
        .find_map(|k| map.get(*k).filter(|v| !v.is_null()).map(|v| (*k, v)))?;
    match serde_json::from_value::<T>(value.clone()) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(field = key, error = %e, "ignoring profile field with unexpected shape");
            None
        }
    }
}

/// Coercing deserializers for loosely typed editor output.
pub(crate) mod lenient {
    use super::{kind_of, MAX_RATING};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// String that also accepts numbers and booleans.
    pub struct Text(pub String);
    /// Non-negative integer that also accepts floats and numeric strings.
    pub struct Count(pub u32);
    /// Float that also accepts numeric strings.
    pub struct Float(pub f32);

    pub fn texts(items: Vec<Text>) -> Vec<String> {
        items.into_iter().map(|t| t.0).collect()
    }

    fn text_from(value: Value) -> Result<String, String> {
        match value {
            Value::Null => Ok(String::new()),
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(format!("expected text, found {}", kind_of(&other))),
        }
    }

    fn float_from(value: Value) -> Result<f64, String> {
        let parsed = match &value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed
            .filter(|f| f.is_finite())
            .ok_or_else(|| format!("expected a number, found {}", kind_of(&value)))
    }

    fn count_from(value: Value) -> Result<u32, String> {
        if value.is_null() {
            return Ok(0);
        }
        let f = float_from(value)?;
        if f < 0.0 {
            return Err(format!("expected a non-negative number, found {f}"));
        }
        Ok(f.round().min(u32::MAX as f64) as u32)
    }

    impl<'de> Deserialize<'de> for Text {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            text_from(Value::deserialize(d)?).map(Text).map_err(D::Error::custom)
        }
    }

    impl<'de> Deserialize<'de> for Count {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            count_from(Value::deserialize(d)?).map(Count).map_err(D::Error::custom)
        }
    }

    impl<'de> Deserialize<'de> for Float {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            float_from(Value::deserialize(d)?)
                .map(|f| Float(f as f32))
                .map_err(D::Error::custom)
        }
    }

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        text_from(Value::deserialize(d)?).map_err(D::Error::custom)
    }

    pub fn u32<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        count_from(Value::deserialize(d)?).map_err(D::Error::custom)
    }

    /// Star rating clamped into `0..=5`.
    pub fn rating<'de, D: Deserializer<'de>>(d: D) -> Result<u8, D::Error> {
        let value = count_from(Value::deserialize(d)?).map_err(D::Error::custom)?;
        Ok(value.min(MAX_RATING as u32) as u8)
    }
}
