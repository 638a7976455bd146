//! Subscription purchase (`Subscriptions` collection).

use super::RawDate;

/// A purchase record.
///
/// The owning account is stored inconsistently: some records carry it in
/// `userId2`, others in `userId`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub id: String,
    pub user_id2: Option<String>,
    pub user_id: Option<String>,
    /// `purchaseDate`, falling back to `purchaseTimestamp`.
    pub purchased: Option<RawDate>,
    pub expires: Option<RawDate>,
    pub package_id: Option<String>,
    pub package_name: Option<String>,
    pub price: Option<String>,
    pub platform: Option<String>,
}
