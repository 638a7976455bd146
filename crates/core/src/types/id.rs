//! Newtype document identifiers for type-safe references.
//!
//! Every record in the remote document store is addressed by an opaque string
//! key. Use the `define_id!` macro to create wrappers that prevent accidentally
//! passing a vehicle key where an account key is expected.

/// Macro to define a type-safe document ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use spot_my_ride_core::define_id;
/// define_id!(AccountKey);
/// define_id!(VehicleKey);
///
/// let account = AccountKey::new("u-123");
/// let vehicle = VehicleKey::new("u-123");
///
/// assert_eq!(account.as_str(), vehicle.as_str());
/// // These are different types, so this won't compile:
/// // let _: AccountKey = vehicle;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a document key.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying document key.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the document key.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// End-user accounts of the mobile application (`users` collection).
define_id!(AccountId);
// Vehicles registered by an account (`myCars` collection).
define_id!(VehicleId);
// Staff credentials (`admin` collection).
define_id!(AdminId);
// Individual notification documents (`notifications` collection).
define_id!(NotificationId);
// Shared key tying together the documents written by one broadcast.
define_id!(BroadcastId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_raw_key() {
        let id = AccountId::new("AbC123xyz");
        assert_eq!(id.to_string(), "AbC123xyz");
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = AdminId::new("admin-1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"admin-1\"");

        let parsed: AdminId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_from_conversions() {
        let from_str: VehicleId = "car-9".into();
        let from_string: VehicleId = String::from("car-9").into();
        assert_eq!(from_str, from_string);
        assert_eq!(from_str.into_inner(), "car-9");
    }
}
