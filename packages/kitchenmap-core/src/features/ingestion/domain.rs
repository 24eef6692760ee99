//! Places feed records and their mapping onto kitchens and ratings
//!
//! The feed's own aggregate rating is not carried over. A kitchen's average
//! is rebuilt from the imported reviews by the rating aggregator.

use kitchenmap_storage::{GeoPoint, KitchenId, NewKitchen, NewRating, MAX_SCORE, MIN_SCORE};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceRecord {
    #[serde(default)]
    pub display_name: Option<LocalizedText>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub national_phone_number: Option<String>,
    #[serde(default)]
    pub location: Option<PlaceLocation>,
    #[serde(default)]
    pub regular_opening_hours: Option<OpeningHours>,
    #[serde(default)]
    pub business_status: Option<String>,
    #[serde(default)]
    pub accessibility_options: Option<AccessibilityOptions>,
    #[serde(default)]
    pub reviews: Vec<PlaceReview>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LocalizedText {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PlaceLocation {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningHours {
    #[serde(default)]
    pub weekday_descriptions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessibilityOptions {
    #[serde(default)]
    pub wheelchair_accessible_parking: Option<bool>,
    #[serde(default)]
    pub wheelchair_accessible_restroom: Option<bool>,
    #[serde(default)]
    pub wheelchair_accessible_seating: Option<bool>,
    #[serde(default)]
    pub wheelchair_accessible_entrance: Option<bool>,
}

impl AccessibilityOptions {
    /// One line per flag that is set, in feed order
    pub fn render(&self) -> Option<String> {
        let lines: Vec<&str> = [
            (self.wheelchair_accessible_parking, "Wheelchair accessible parking"),
            (self.wheelchair_accessible_restroom, "Wheelchair accessible restroom"),
            (self.wheelchair_accessible_seating, "Wheelchair accessible seating"),
            (self.wheelchair_accessible_entrance, "Wheelchair accessible entrance"),
        ]
        .into_iter()
        .filter(|(flag, _)| flag.unwrap_or(false))
        .map(|(_, line)| line)
        .collect();

        (!lines.is_empty()).then(|| lines.join("\n"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceReview {
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub text: Option<LocalizedText>,
    #[serde(default)]
    pub author_attribution: Option<AuthorAttribution>,
    #[serde(default)]
    pub publish_time: Option<String>,
    #[serde(default)]
    pub relative_publish_time_description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorAttribution {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
}

impl PlaceRecord {
    /// Trimmed display name, `None` when missing or blank
    pub fn name(&self) -> Option<&str> {
        self.display_name
            .as_ref()
            .map(|n| n.text.trim())
            .filter(|n| !n.is_empty())
    }

    /// Kitchen insert payload, `None` for a nameless place
    pub fn to_new_kitchen(&self) -> Option<NewKitchen> {
        let name = self.name()?;
        let operating_hours = self
            .regular_opening_hours
            .as_ref()
            .map(|h| h.weekday_descriptions.join("\n"))
            .filter(|h| !h.is_empty());

        Some(NewKitchen {
            name: name.to_string(),
            address: self.formatted_address.clone().unwrap_or_default(),
            contact_phone: non_blank(self.national_phone_number.as_deref()),
            location: self
                .location
                .map(|l| GeoPoint::new(l.latitude, l.longitude)),
            operating_hours,
            operational_status: non_blank(self.business_status.as_deref()),
            accessibility_features: self
                .accessibility_options
                .as_ref()
                .and_then(AccessibilityOptions::render),
        })
    }
}

impl PlaceReview {
    /// Integral score of the review, if it has one
    pub fn score(&self) -> Option<i32> {
        self.rating.map(|r| r.round() as i32)
    }

    /// Rating insert payload, `None` when the score is missing or out of range
    pub fn to_new_rating(&self, kitchen_id: KitchenId) -> Option<NewRating> {
        let score = self.score().filter(|s| (MIN_SCORE..=MAX_SCORE).contains(s))?;
        let author = self.author_attribution.as_ref();

        Some(NewRating {
            kitchen_id,
            user_id: None,
            user_name: author.and_then(|a| non_blank(a.display_name.as_deref())),
            score,
            comments: self
                .text
                .as_ref()
                .and_then(|t| non_blank(Some(t.text.as_str()))),
            wait_time_secs: None,
            comment_url: author.and_then(|a| non_blank(a.uri.as_deref())),
            publish_time: non_blank(self.publish_time.as_deref()),
            relative_time: non_blank(self.relative_publish_time_description.as_deref()),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Import run summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub places_seen: usize,
    pub kitchens_created: usize,
    pub places_skipped: usize,
    pub ratings_imported: usize,
    pub reviews_skipped: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PLACE: &str = r#"{
        "displayName": {"text": "Holy Apostles Soup Kitchen", "languageCode": "en"},
        "formattedAddress": "296 9th Ave, New York, NY 10001, USA",
        "nationalPhoneNumber": "(212) 924-0167",
        "location": {"latitude": 40.7497, "longitude": -73.9993},
        "rating": 4.6,
        "regularOpeningHours": {"weekdayDescriptions": [
            "Monday: 10:30 AM - 12:30 PM",
            "Tuesday: 10:30 AM - 12:30 PM"
        ]},
        "businessStatus": "OPERATIONAL",
        "accessibilityOptions": {
            "wheelchairAccessibleParking": false,
            "wheelchairAccessibleEntrance": true,
            "wheelchairAccessibleRestroom": true
        },
        "reviews": [
            {"rating": 5,
             "text": {"text": "Warm meal and kind volunteers"},
             "authorAttribution": {"displayName": "R. Diaz", "uri": "https://maps.example/r1"},
             "publishTime": "2024-03-01T12:00:00Z",
             "relativePublishTimeDescription": "7 months ago"},
            {"rating": 0}
        ]
    }"#;

    #[test]
    fn test_place_maps_to_kitchen() {
        let place: PlaceRecord = serde_json::from_str(PLACE).unwrap();
        let kitchen = place.to_new_kitchen().unwrap();

        assert_eq!(kitchen.name, "Holy Apostles Soup Kitchen");
        assert_eq!(kitchen.contact_phone.as_deref(), Some("(212) 924-0167"));
        assert_eq!(kitchen.location, Some(GeoPoint::new(40.7497, -73.9993)));
        assert_eq!(
            kitchen.operating_hours.as_deref(),
            Some("Monday: 10:30 AM - 12:30 PM\nTuesday: 10:30 AM - 12:30 PM")
        );
        assert_eq!(kitchen.operational_status.as_deref(), Some("OPERATIONAL"));
        assert_eq!(
            kitchen.accessibility_features.as_deref(),
            Some("Wheelchair accessible restroom\nWheelchair accessible entrance")
        );
    }

    #[test]
    fn test_reviews_map_to_ratings() {
        let place: PlaceRecord = serde_json::from_str(PLACE).unwrap();

        let rating = place.reviews[0].to_new_rating(9).unwrap();
        assert_eq!(rating.kitchen_id, 9);
        assert_eq!(rating.score, 5);
        assert_eq!(rating.user_name.as_deref(), Some("R. Diaz"));
        assert_eq!(rating.comment_url.as_deref(), Some("https://maps.example/r1"));
        assert_eq!(rating.relative_time.as_deref(), Some("7 months ago"));

        // Out of range
        assert!(place.reviews[1].to_new_rating(9).is_none());
    }

    #[test]
    fn test_nameless_place_is_skipped() {
        let place: PlaceRecord =
            serde_json::from_str(r#"{"displayName": {"text": "  "}}"#).unwrap();
        assert!(place.to_new_kitchen().is_none());
        assert!(PlaceRecord::default().to_new_kitchen().is_none());
    }

    #[test]
    fn test_no_accessibility_flags() {
        assert_eq!(AccessibilityOptions::default().render(), None);
    }
}
