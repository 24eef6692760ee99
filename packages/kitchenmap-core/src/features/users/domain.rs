//! Account tiers and profiles
//!
//! Tiers are never stored. They are derived on every read from the account
//! age and the number of ratings the user has submitted.

use chrono::{DateTime, Datelike, Timelike, Utc};
use kitchenmap_storage::{AccountRole, User, UserId};
use serde::{Deserialize, Serialize};

/// Membership tier, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl UserTier {
    /// Higher of the age tier and the activity tier
    pub fn derive(account_age_months: u32, activity_count: usize) -> Self {
        Self::from_age(account_age_months).max(Self::from_activity(activity_count))
    }

    fn from_age(months: u32) -> Self {
        match months {
            m if m >= 5 => UserTier::Platinum,
            m if m >= 3 => UserTier::Gold,
            m if m >= 1 => UserTier::Silver,
            _ => UserTier::Bronze,
        }
    }

    fn from_activity(count: usize) -> Self {
        match count {
            c if c >= 50 => UserTier::Platinum,
            c if c >= 20 => UserTier::Gold,
            c if c >= 5 => UserTier::Silver,
            _ => UserTier::Bronze,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserTier::Bronze => "bronze",
            UserTier::Silver => "silver",
            UserTier::Gold => "gold",
            UserTier::Platinum => "platinum",
        }
    }
}

/// Whole calendar months from `from` to `to` (0 when `to` is earlier)
pub fn months_between(from: DateTime<Utc>, to: DateTime<Utc>) -> u32 {
    let mut months =
        (to.year() - from.year()) * 12 + (to.month() as i32 - from.month() as i32);
    let from_rest = (from.day(), from.num_seconds_from_midnight(), from.nanosecond());
    let to_rest = (to.day(), to.num_seconds_from_midnight(), to.nanosecond());
    if to_rest < from_rest {
        months -= 1;
    }
    months.max(0) as u32
}

/// Public view of an account (no credential)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub role: AccountRole,
    pub tier: UserTier,
    pub ratings_submitted: usize,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn derive(user: &User, ratings_submitted: usize, now: DateTime<Utc>) -> Self {
        let age = months_between(user.created_at, now);
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
            tier: UserTier::derive(age, ratings_submitted),
            ratings_submitted,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_months_between_counts_whole_months() {
        assert_eq!(months_between(at(2024, 1, 15), at(2024, 1, 30)), 0);
        assert_eq!(months_between(at(2024, 1, 15), at(2024, 2, 14)), 0);
        assert_eq!(months_between(at(2024, 1, 15), at(2024, 2, 15)), 1);
        assert_eq!(months_between(at(2023, 11, 1), at(2024, 4, 1)), 5);
        assert_eq!(months_between(at(2024, 5, 1), at(2024, 1, 1)), 0);
    }

    #[test]
    fn test_age_tiers() {
        assert_eq!(UserTier::derive(0, 0), UserTier::Bronze);
        assert_eq!(UserTier::derive(1, 0), UserTier::Silver);
        assert_eq!(UserTier::derive(3, 0), UserTier::Gold);
        assert_eq!(UserTier::derive(5, 0), UserTier::Platinum);
    }

    #[test]
    fn test_activity_can_lift_tier() {
        assert_eq!(UserTier::derive(0, 5), UserTier::Silver);
        assert_eq!(UserTier::derive(0, 20), UserTier::Gold);
        assert_eq!(UserTier::derive(1, 50), UserTier::Platinum);
        // Higher of the two wins
        assert_eq!(UserTier::derive(5, 1), UserTier::Platinum);
    }

    #[test]
    fn test_profile_tier_is_rederived() {
        let user = User {
            id: 1,
            username: "ana".to_string(),
            password_hash: "sha256$s$d".to_string(),
            role: AccountRole::Member,
            created_at: at(2024, 1, 1),
        };

        assert_eq!(UserProfile::derive(&user, 0, at(2024, 1, 20)).tier, UserTier::Bronze);
        assert_eq!(UserProfile::derive(&user, 0, at(2024, 4, 2)).tier, UserTier::Gold);
    }
}
