//! User and address domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use copperleaf_core::{Email, UserId};

/// A shipping address.
///
/// The same shape serves as a user's saved address and as the shipping
/// snapshot captured on an order. Two addresses are considered the same
/// destination when street and postal code match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Street address.
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl Address {
    /// Whether two addresses point at the same destination (street + postal
    /// code equality, the dedup rule for the saved-address list).
    #[must_use]
    pub fn is_same_destination(&self, other: &Self) -> bool {
        self.address == other.address && self.zip_code == other.zip_code
    }
}

/// A storefront user (domain type).
///
/// The password hash never leaves the database layer; repositories return it
/// separately where verification needs it.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    /// Saved shipping addresses, in append order.
    pub addresses: Vec<Address>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn address(street: &str, zip: &str) -> Address {
        Address {
            full_name: None,
            email: None,
            phone: None,
            address: street.to_owned(),
            city: "Springfield".to_owned(),
            state: "IL".to_owned(),
            zip_code: zip.to_owned(),
            country: "US".to_owned(),
        }
    }

    #[test]
    fn test_same_destination_matches_street_and_zip() {
        let a = address("12 Oak Ave", "62704");
        let mut b = address("12 Oak Ave", "62704");
        b.city = "Capital City".to_owned();

        // City differences don't matter for dedup.
        assert!(a.is_same_destination(&b));

        let c = address("12 Oak Ave", "62705");
        assert!(!a.is_same_destination(&c));
    }

    #[test]
    fn test_address_wire_format() {
        let json = serde_json::to_value(address("12 Oak Ave", "62704")).unwrap();
        assert_eq!(json["zipCode"], "62704");
        assert_eq!(json["address"], "12 Oak Ave");
        // Absent optional fields are omitted, not null.
        assert!(json.get("fullName").is_none());
    }
}
