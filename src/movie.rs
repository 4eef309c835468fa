use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// The whole collection, keyed by title, in file (insertion) order.
pub type Catalog = IndexMap<String, Movie>;

/// Poster value used when the movie has no poster.
pub const NO_POSTER: &str = "N/A";

/// A single catalog entry. The title is the catalog key and is not
/// repeated here.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Movie {
    #[serde(deserialize_with = "legacy_year")]
    pub year: i32,
    #[serde(deserialize_with = "legacy_rating")]
    pub rating: f64,
    #[serde(default = "no_poster")]
    pub poster: String,
}

impl Movie {
    pub fn new(year: i32, rating: f64, poster: impl Into<String>) -> Self {
        Movie {
            year,
            rating,
            poster: poster.into(),
        }
    }
}

pub(crate) fn no_poster() -> String {
    NO_POSTER.to_string()
}

/// Leading four digits, so series ranges like "2010–2012" map to 2010.
pub fn parse_year(text: &str) -> Option<i32> {
    let digits: String = text.trim().chars().take_while(char::is_ascii_digit).collect();
    if digits.len() < 4 {
        return None;
    }
    digits[..4].parse().ok()
}

// Older catalog files stored year and rating exactly as the lookup
// service returned them, i.e. as strings such as "2010–2017" or "N/A".
#[derive(Deserialize)]
#[serde(untagged)]
enum Raw<T> {
    Value(T),
    Text(String),
}

fn legacy_year<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Raw::<i32>::deserialize(deserializer)? {
        Raw::Value(v) => v,
        Raw::Text(s) => parse_year(&s).unwrap_or_else(|| {
            log::warn!("unreadable year '{}' in catalog, using 0", s);
            0
        }),
    })
}

fn legacy_rating<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Raw::<f64>::deserialize(deserializer)? {
        Raw::Value(v) => v,
        Raw::Text(s) => s.trim().parse().unwrap_or_else(|_| {
            log::warn!("unreadable rating '{}' in catalog, using 0.0", s);
            0.0
        }),
    })
}
