use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier for an authenticated identity, issued by the external
/// identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(pub String);

impl Principal {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Principal {
    fn from(s: &str) -> Self {
        Principal(s.to_string())
    }
}

/// A travel destination. Read-only from this tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Destination {
    pub id: u64,
    pub name: String,
    pub city: String,
    pub country: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportType {
    Flight,
    Train,
}

impl fmt::Display for TransportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportType::Flight => write!(f, "flight"),
            TransportType::Train => write!(f, "train"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingType {
    Flight,
    Train,
}

impl BookingType {
    /// A booking may only be created against a transport option of the same
    /// kind.
    pub fn matches(&self, transport: TransportType) -> bool {
        matches!(
            (self, transport),
            (BookingType::Flight, TransportType::Flight) | (BookingType::Train, TransportType::Train)
        )
    }
}

impl From<TransportType> for BookingType {
    fn from(t: TransportType) -> Self {
        match t {
            TransportType::Flight => BookingType::Flight,
            TransportType::Train => BookingType::Train,
        }
    }
}

impl fmt::Display for BookingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingType::Flight => write!(f, "flight"),
            BookingType::Train => write!(f, "train"),
        }
    }
}

/// A bookable flight or train slot tied to a destination. Seat counts are
/// authoritative on the backend; this tier never mutates them directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportOption {
    pub id: u64,
    pub destination_id: u64,
    pub transport_type: TransportType,
    pub schedule: String,
    pub available_seats: u64,
}

/// A confirmed booking. `details` is an opaque JSON blob encoded at
/// submission time; `created_at` is a client-generated nanosecond timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: u64,
    pub user_id: Principal,
    pub booking_type: BookingType,
    pub details: String,
    pub transport_option_id: Option<u64>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactInquiry {
    pub name: String,
    pub email: String,
    pub message: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
    Guest,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_types_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&TransportType::Flight).unwrap(), "\"flight\"");
        assert_eq!(serde_json::to_string(&BookingType::Train).unwrap(), "\"train\"");
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"admin\"");
    }

    #[test]
    fn booking_type_must_match_transport_type() {
        assert!(BookingType::Flight.matches(TransportType::Flight));
        assert!(BookingType::Train.matches(TransportType::Train));
        assert!(!BookingType::Flight.matches(TransportType::Train));
        assert!(!BookingType::Train.matches(TransportType::Flight));
    }

    #[test]
    fn transport_option_uses_camel_case_wire_names() {
        let option = TransportOption {
            id: 7,
            destination_id: 3,
            transport_type: TransportType::Train,
            schedule: "Daily 08:30".to_string(),
            available_seats: 12,
        };
        let json = serde_json::to_value(&option).unwrap();
        assert_eq!(json["destinationId"], 3);
        assert_eq!(json["availableSeats"], 12);
        assert_eq!(json["transportType"], "train");
    }

    #[test]
    fn booking_round_trips_optional_transport_option() {
        let booking = Booking {
            id: 1,
            user_id: Principal::from("did:web:example:alice"),
            booking_type: BookingType::Flight,
            details: "{}".to_string(),
            transport_option_id: None,
            created_at: 1_700_000_000_000_000_000,
        };
        let json = serde_json::to_string(&booking).unwrap();
        let back: Booking = serde_json::from_str(&json).unwrap();
        assert_eq!(back.transport_option_id, None);
        assert_eq!(back.user_id, booking.user_id);
    }
}
