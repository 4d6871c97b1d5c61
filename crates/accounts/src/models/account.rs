//! Account domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use cpath_core::{AccountId, Email};

/// A JSON scalar accepted where free text is expected.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
}

/// Deserialize an optional free-text field, stringifying numbers and booleans.
///
/// `{"phone": 5551234}` reads as `Some("5551234")`. Arrays and objects are
/// still rejected.
///
/// # Errors
///
/// Returns the deserializer's error for any non-scalar value.
pub fn scalar_as_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Scalar> = Option::deserialize(deserializer)?;
    Ok(value.map(|value| match value {
        Scalar::Text(s) => s,
        Scalar::Bool(b) => b.to_string(),
        Scalar::Int(n) => n.to_string(),
        Scalar::UInt(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
    }))
}

/// Free-text profile attributes of an account.
///
/// None of these are validated; they are stored as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

impl Profile {
    /// Apply an update, overwriting only the fields the update carries.
    pub fn apply(&mut self, update: &ProfileUpdate) {
        fn set(target: &mut Option<String>, value: Option<&String>) {
            if let Some(value) = value {
                *target = Some(value.clone());
            }
        }

        set(&mut self.name, update.name.as_ref());
        set(&mut self.country, update.country.as_ref());
        set(&mut self.state, update.state.as_ref());
        set(&mut self.city, update.city.as_ref());
        set(&mut self.address, update.address.as_ref());
        set(&mut self.phone, update.phone.as_ref());
    }
}

/// A persisted account (domain type).
///
/// Serializes flat, with the password hash exposed under `password`.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    /// Store-assigned account ID.
    pub id: AccountId,
    /// Unique, normalized email address.
    pub email: Email,
    /// Argon2id PHC string. Never the plaintext.
    #[serde(rename = "password")]
    pub password_hash: String,
    #[serde(flatten)]
    pub profile: Profile,
    /// When the account was registered.
    pub created_at: DateTime<Utc>,
    /// When the profile was last changed.
    pub updated_at: DateTime<Utc>,
}

/// An account about to be inserted.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: Email,
    pub password_hash: String,
    pub profile: Profile,
}

/// The fields a profile update may change.
///
/// This is an allow-list: `email`, `password`, `id` and timestamps have no
/// counterpart here, so a request body carrying them cannot alter them.
/// Absent fields leave the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub phone: Option<String>,
}

impl ProfileUpdate {
    /// Returns `true` when the update would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.country.is_none()
            && self.state.is_none()
            && self.city.is_none()
            && self.address.is_none()
            && self.phone.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_overwrites_only_present_fields() {
        let mut profile = Profile {
            name: Some("Ada".to_string()),
            city: Some("London".to_string()),
            phone: Some("555".to_string()),
            ..Profile::default()
        };

        profile.apply(&ProfileUpdate {
            city: Some("Paris".to_string()),
            ..ProfileUpdate::default()
        });

        assert_eq!(profile.city.as_deref(), Some("Paris"));
        assert_eq!(profile.name.as_deref(), Some("Ada"));
        assert_eq!(profile.phone.as_deref(), Some("555"));
    }

    #[test]
    fn test_update_ignores_identity_and_credential_keys() {
        let update: ProfileUpdate = serde_json::from_str(
            r#"{"city": "X", "email": "evil@example.com", "password": "plain", "id": 9}"#,
        )
        .unwrap();

        assert_eq!(
            update,
            ProfileUpdate {
                city: Some("X".to_string()),
                ..ProfileUpdate::default()
            }
        );
    }

    #[test]
    fn test_update_stringifies_scalars() {
        let update: ProfileUpdate = serde_json::from_str(
            r#"{"phone": 5551234, "address": 12.5, "name": true, "city": null}"#,
        )
        .unwrap();

        assert_eq!(update.phone.as_deref(), Some("5551234"));
        assert_eq!(update.address.as_deref(), Some("12.5"));
        assert_eq!(update.name.as_deref(), Some("true"));
        assert_eq!(update.city, None);
        assert_eq!(update.country, None);
    }

    #[test]
    fn test_update_rejects_structured_values() {
        assert!(serde_json::from_str::<ProfileUpdate>(r#"{"phone": [1, 2]}"#).is_err());
        assert!(serde_json::from_str::<ProfileUpdate>(r#"{"city": {"a": 1}}"#).is_err());
    }

    #[test]
    fn test_empty_update() {
        assert!(ProfileUpdate::default().is_empty());
        let update: ProfileUpdate = serde_json::from_str(r#"{"password": "x"}"#).unwrap();
        assert!(update.is_empty());
    }

    #[test]
    fn test_account_serializes_flat_with_password_key() {
        let now = Utc::now();
        let account = Account {
            id: AccountId::new(1),
            email: Email::parse("a@b.com").unwrap(),
            password_hash: "$argon2id$v=19$stub".to_string(),
            profile: Profile {
                city: Some("X".to_string()),
                ..Profile::default()
            },
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["email"], "a@b.com");
        assert_eq!(json["password"], "$argon2id$v=19$stub");
        assert_eq!(json["city"], "X");
        assert!(json["name"].is_null());
        assert!(json.get("profile").is_none());
        assert!(json.get("password_hash").is_none());
    }
}
