//! Recommendation requests and prompt rendering

use kitchenmap_storage::{Kitchen, Rating};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

use crate::features::geo::{distance_km, UserLocation};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub address: String,
    #[serde(default)]
    pub accessibility_needs: Option<String>,
    #[serde(default)]
    pub meal_hours: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub answer: String,
    pub location: UserLocation,
}

/// Prompt listing the user's situation and every kitchen with its ratings
pub fn render_prompt(
    location: &UserLocation,
    kitchens: &[Kitchen],
    ratings: &[Rating],
    accessibility_needs: Option<&str>,
    meal_hours: Option<&str>,
) -> String {
    let mut prompt = String::new();
    // Writing to a String cannot fail
    let _ = writeln!(
        prompt,
        "You help people find a soup kitchen. Recommend the best options for this person \
         and explain briefly why."
    );
    let _ = writeln!(
        prompt,
        "\nUser location: {} ({:.5}, {:.5})",
        location.formatted_address, location.latitude, location.longitude
    );
    let _ = writeln!(
        prompt,
        "Accessibility needs: {}",
        accessibility_needs.unwrap_or("none stated")
    );
    let _ = writeln!(prompt, "Preferred meal hours: {}", meal_hours.unwrap_or("any"));

    let _ = writeln!(prompt, "\nKitchens:");
    for kitchen in kitchens {
        let _ = write!(prompt, "- {} | {}", kitchen.name, kitchen.address);
        if let Some(point) = kitchen.location {
            let _ = write!(prompt, " | {:.2} km away", distance_km(location.point(), point));
        }
        match kitchen.average_rating {
            Some(avg) => {
                let _ = write!(prompt, " | average rating {:.2}", avg);
            }
            None => {
                let _ = write!(prompt, " | unrated");
            }
        }
        let _ = writeln!(prompt);
        for (label, value) in [
            ("hours", &kitchen.operating_hours),
            ("status", &kitchen.operational_status),
            ("accessibility", &kitchen.accessibility_features),
        ] {
            if let Some(value) = value {
                let _ = writeln!(prompt, "  {}: {}", label, value.replace('\n', "; "));
            }
        }

        for rating in ratings.iter().filter(|r| r.kitchen_id == kitchen.id) {
            let _ = write!(prompt, "  review {}/5", rating.score);
            if let Some(comments) = &rating.comments {
                let _ = write!(prompt, ": {}", comments.replace('\n', " "));
            }
            let _ = writeln!(prompt);
        }
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use kitchenmap_storage::GeoPoint;

    fn kitchen(id: i64, name: &str, location: Option<GeoPoint>) -> Kitchen {
        Kitchen {
            id,
            name: name.to_string(),
            address: format!("{} Main St", id),
            contact_phone: None,
            location,
            average_rating: None,
            operating_hours: Some("Mon: 9-5\nTue: 9-5".to_string()),
            operational_status: None,
            accessibility_features: None,
            version: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_prompt_lists_kitchens_and_reviews() {
        let origin = UserLocation::new(40.8075, -73.9626, "Columbia University");
        let mut near = kitchen(1, "Near Kitchen", Some(GeoPoint::new(40.81, -73.96)));
        near.average_rating = Some(4.5);
        let far = kitchen(2, "Unmapped Kitchen", None);
        let review = Rating {
            id: 1,
            kitchen_id: 1,
            user_id: None,
            user_name: None,
            score: 5,
            comments: Some("Friendly staff".to_string()),
            wait_time_secs: None,
            comment_url: None,
            publish_time: None,
            relative_time: None,
            created_at: Utc::now(),
        };

        let prompt = render_prompt(&origin, &[near, far], &[review], Some("wheelchair"), None);

        assert!(prompt.contains("Columbia University"));
        assert!(prompt.contains("Accessibility needs: wheelchair"));
        assert!(prompt.contains("Preferred meal hours: any"));
        assert!(prompt.contains("Near Kitchen"));
        assert!(prompt.contains("km away | average rating 4.50"));
        assert!(prompt.contains("Unmapped Kitchen | 2 Main St | unrated"));
        assert!(prompt.contains("hours: Mon: 9-5; Tue: 9-5"));
        assert!(prompt.contains("review 5/5: Friendly staff"));
    }
}
