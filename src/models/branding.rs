//! Site branding, merged with defaults on read.

use serde::{Deserialize, Deserializer, Serialize};

use crate::db::StoredDocument;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BrandingData {
    #[serde(deserialize_with = "null_as_default")]
    pub event_title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub event_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub event_location: String,
    #[serde(deserialize_with = "null_as_default")]
    pub primary_color: String,
    #[serde(deserialize_with = "null_as_default")]
    pub secondary_color: String,
    #[serde(deserialize_with = "null_as_default")]
    pub header_text_color: String,
    #[serde(deserialize_with = "null_as_default")]
    pub content_text_color: String,
    #[serde(deserialize_with = "null_as_default")]
    pub background_color: String,
    #[serde(deserialize_with = "null_as_default")]
    pub header_background_color: String,
    #[serde(deserialize_with = "null_as_default")]
    pub logo_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub header_background_image_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub page_background_image_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub use_header_background_image: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub use_page_background_image: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub sponsor_logos: Vec<String>,
}

/// Stored files may hold `null` where a value was never set.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Default for BrandingData {
    fn default() -> Self {
        Self {
            event_title: "fwdLive! GOING FOR GROWTH 2025".to_string(),
            event_date: "12 June 2025".to_string(),
            event_location: "Crowne Plaza, Stratford upon Avon".to_string(),
            primary_color: "blue".to_string(),
            secondary_color: "gray".to_string(),
            header_text_color: "white".to_string(),
            content_text_color: "black".to_string(),
            background_color: "gray".to_string(),
            header_background_color: "blue".to_string(),
            logo_url: String::new(),
            header_background_image_url: String::new(),
            page_background_image_url: String::new(),
            use_header_background_image: false,
            use_page_background_image: false,
            sponsor_logos: Vec::new(),
        }
    }
}

impl BrandingData {
    /// Fill blank text fields from the defaults.
    ///
    /// Missing fields are already defaulted during deserialization; `null`
    /// fields arrive here blank.
    pub fn merged_with_defaults(mut self) -> Self {
        let defaults = BrandingData::default();
        let pairs = [
            (&mut self.event_title, defaults.event_title),
            (&mut self.event_date, defaults.event_date),
            (&mut self.event_location, defaults.event_location),
            (&mut self.primary_color, defaults.primary_color),
            (&mut self.secondary_color, defaults.secondary_color),
            (&mut self.header_text_color, defaults.header_text_color),
            (&mut self.content_text_color, defaults.content_text_color),
            (&mut self.background_color, defaults.background_color),
            (&mut self.header_background_color, defaults.header_background_color),
        ];
        for (field, default) in pairs {
            if field.trim().is_empty() {
                *field = default;
            }
        }
        self
    }

    /// First required field that is blank, if any.
    pub fn missing_required_field(&self) -> Option<&'static str> {
        [
            ("eventTitle", &self.event_title),
            ("eventDate", &self.event_date),
            ("eventLocation", &self.event_location),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }
}

impl StoredDocument for BrandingData {
    const KEY: &'static str = "branding";

    fn default_document() -> Self {
        BrandingData::default()
    }

    fn normalize(self) -> Self {
        self.merged_with_defaults()
    }
}
