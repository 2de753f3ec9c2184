//! Domain types for the booking API.
//!
//! Identifier newtypes keep booking, user and therapist ids from being mixed
//! up at call sites. The backend emits numeric ids; they are carried as strings
//! because they only ever end up in URL paths.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            /// Create a new id from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the inner string value.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<u64> for $name {
            fn from(n: u64) -> Self {
                Self(n.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Booking identifier.
    BookingId
);
string_id!(
    /// User account identifier.
    UserId
);
string_id!(
    /// Therapist identifier (staff-managed).
    TherapistId
);

/// Account role as reported by `/me`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    /// Books sessions.
    Customer,
    /// Accepts and performs bookings.
    Therapist,
    /// Legacy name for a therapist account.
    Cleaner,
    /// Back-office staff.
    Staff,
    /// Staff with full administrative rights.
    SuperAdmin,
    /// Any role this client does not know about.
    Other(String),
}

impl Role {
    /// Wire name of the role.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Customer => "customer",
            Self::Therapist => "therapist",
            Self::Cleaner => "cleaner",
            Self::Staff => "staff",
            Self::SuperAdmin => "super_admin",
            Self::Other(s) => s,
        }
    }

    /// Therapist-side account (therapist or cleaner).
    pub const fn is_therapist(&self) -> bool {
        matches!(self, Self::Therapist | Self::Cleaner)
    }

    /// Staff-side account (staff or super admin).
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Staff | Self::SuperAdmin)
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        match s {
            "customer" => Self::Customer,
            "therapist" => Self::Therapist,
            "cleaner" => Self::Cleaner,
            "staff" => Self::Staff,
            "super_admin" => Self::SuperAdmin,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s.as_str()))
    }
}

/// Authenticated user as returned under the `user` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Account id.
    #[serde(default)]
    pub id: serde_json::Value,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Login email.
    #[serde(default)]
    pub email: String,
    /// Account role. Absent roles deserialize as an unknown, empty role.
    #[serde(default)]
    pub role: Role,
    /// Stored image path, relative to the storage root.
    #[serde(default)]
    pub profile_image: Option<String>,
    /// Absolute image URL, when the backend provides one.
    #[serde(default)]
    pub profile_image_url: Option<String>,
}

/// Booking lifecycle status, used for list filters and status updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Awaiting therapist response.
    Pending,
    /// Accepted by a therapist.
    Accepted,
    /// Declined by a therapist.
    Declined,
    /// Session underway.
    InProgress,
    /// Session finished.
    Completed,
    /// Cancelled by the customer or staff.
    Cancelled,
}

impl BookingStatus {
    /// Wire name of the status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
