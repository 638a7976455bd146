//! Read-time join of accounts with their vehicles, pins and subscriptions.
//!
//! Foreign keys in the source collections are unreliable, so ownership is
//! resolved through small ordered rule lists. Each rule is a plain function
//! and the first rule yielding a non-empty key wins.
//!
//! Every account produces exactly one record (left join). Each group of
//! related documents is attached to at most one account: a group is removed
//! from the lookup table once claimed.

use std::collections::HashMap;

use serde::Serialize;

use spot_my_ride_core::{AccountId, AccountStatus};

use super::format::{
    NOT_AVAILABLE, format_date, normalize_package, normalize_platform, or_na,
};
use crate::models::{Account, PinnedLocation, Subscription, Vehicle, VehicleSnapshot};

/// The four collections a user record is built from.
#[derive(Debug, Default)]
pub struct UserSources {
    pub accounts: Vec<Account>,
    pub vehicles: Vec<Vehicle>,
    pub pins: Vec<PinnedLocation>,
    pub subscriptions: Vec<Subscription>,
}

/// One row of the user table plus everything the detail page shows.
#[derive(Debug, Clone, Serialize)]
pub struct UserRecord {
    /// 1-based position in the full listing; not an identifier.
    pub index: usize,
    pub id: AccountId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: AccountStatus,
    pub joined: String,
    pub last_active: String,
    pub image: Option<String>,
    pub total_spots: String,
    pub subscription_summary: String,
    pub has_device_token: bool,
    pub vehicles: Vec<VehicleView>,
    pub pins: Vec<PinView>,
    pub subscriptions: Vec<SubscriptionView>,
}

impl UserRecord {
    #[must_use]
    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Detail page path, with the document id percent-encoded.
    #[must_use]
    pub fn detail_href(&self) -> String {
        format!("/user/{}", urlencoding::encode(self.id.as_str()))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VehicleView {
    pub id: String,
    pub name: String,
    pub plate_number: String,
    pub color: String,
    pub added: String,
    /// First image, shown as the thumbnail.
    pub image: Option<String>,
}

impl From<&Vehicle> for VehicleView {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            id: vehicle.id.to_string(),
            name: or_na(vehicle.name.as_deref()),
            plate_number: or_na(vehicle.plate_number.as_deref()),
            color: or_na(vehicle.color.as_deref()),
            added: format_date(vehicle.added.as_ref()),
            image: vehicle.images.first().cloned(),
        }
    }
}

impl From<&VehicleSnapshot> for VehicleView {
    fn from(snapshot: &VehicleSnapshot) -> Self {
        Self {
            id: or_na(snapshot.car_id.as_deref()),
            name: or_na(snapshot.name.as_deref()),
            plate_number: or_na(snapshot.plate_number.as_deref()),
            color: or_na(snapshot.color.as_deref()),
            added: format_date(snapshot.added.as_ref()),
            image: snapshot.images.first().cloned(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PinView {
    pub pin_car_id: String,
    pub description: String,
    pub latitude: String,
    pub longitude: String,
    pub pinned: String,
    pub vehicle: VehicleView,
}

impl From<&PinnedLocation> for PinView {
    fn from(pin: &PinnedLocation) -> Self {
        Self {
            pin_car_id: or_na(pin.pin_car_id.as_deref()),
            description: or_na(pin.description.as_deref()),
            latitude: or_na(pin.latitude.as_deref()),
            longitude: or_na(pin.longitude.as_deref()),
            pinned: format_date(pin.pinned.as_ref()),
            vehicle: VehicleView::from(&pin.vehicle),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionView {
    pub purchased: String,
    pub expires: String,
    pub package: String,
    pub package_name: String,
    pub price: String,
    pub platform: String,
}

impl From<&Subscription> for SubscriptionView {
    fn from(sub: &Subscription) -> Self {
        Self {
            purchased: format_date(sub.purchased.as_ref()),
            expires: format_date(sub.expires.as_ref()),
            package: normalize_package(sub.package_id.as_deref()),
            package_name: or_na(sub.package_name.as_deref()),
            price: or_na(sub.price.as_deref()),
            platform: normalize_platform(sub.platform.as_deref()),
        }
    }
}

// =============================================================================
// Ownership rules
// =============================================================================

type SubscriptionOwnerRule = fn(&Subscription) -> Option<&str>;
type AccountKeyRule = fn(&Account) -> Option<&str>;

fn owner_from_user_id2(sub: &Subscription) -> Option<&str> {
    sub.user_id2.as_deref()
}

fn owner_from_user_id(sub: &Subscription) -> Option<&str> {
    sub.user_id.as_deref()
}

/// Where a subscription's owning key is read from, in priority order.
const SUBSCRIPTION_OWNER_RULES: &[SubscriptionOwnerRule] =
    &[owner_from_user_id2, owner_from_user_id];

fn key_from_document_id(account: &Account) -> Option<&str> {
    Some(account.id.as_str())
}

fn key_from_uid(account: &Account) -> Option<&str> {
    account.uid.as_deref()
}

fn key_from_user_id2(account: &Account) -> Option<&str> {
    account.user_id2.as_deref()
}

/// Which account keys may claim a subscription group, in priority order.
const ACCOUNT_KEY_RULES: &[AccountKeyRule] =
    &[key_from_document_id, key_from_uid, key_from_user_id2];

/// Owning key of a subscription.
///
/// The first non-empty field is chosen, then trimmed. Records with no key
/// fall into the `N/A` group, which never attaches to an account.
#[must_use]
pub fn subscription_owner(sub: &Subscription) -> String {
    SUBSCRIPTION_OWNER_RULES
        .iter()
        .find_map(|rule| rule(sub).filter(|key| !key.is_empty()))
        .map_or_else(|| NOT_AVAILABLE.to_string(), |key| key.trim().to_owned())
}

fn group_by<T: Clone>(
    items: &[T],
    key: impl Fn(&T) -> Option<String>,
) -> HashMap<String, Vec<T>> {
    let mut groups: HashMap<String, Vec<T>> = HashMap::new();
    for item in items {
        if let Some(k) = key(item) {
            groups.entry(k).or_default().push(item.clone());
        }
    }
    groups
}

/// Hand out subscription groups to accounts.
///
/// Rules run one at a time across all accounts, so a document-id match
/// always beats a `uid` match on a different account.
fn claim_subscriptions(
    accounts: &[Account],
    mut groups: HashMap<String, Vec<Subscription>>,
) -> Vec<Vec<Subscription>> {
    groups.remove(NOT_AVAILABLE);
    let mut claimed: Vec<Option<Vec<Subscription>>> = vec![None; accounts.len()];

    for rule in ACCOUNT_KEY_RULES {
        for (slot, account) in claimed.iter_mut().zip(accounts) {
            if slot.is_some() {
                continue;
            }
            if let Some(group) = rule(account)
                .filter(|key| !key.is_empty())
                .and_then(|key| groups.remove(key))
            {
                *slot = Some(group);
            }
        }
    }

    claimed.into_iter().map(Option::unwrap_or_default).collect()
}

/// Build one record per account.
#[must_use]
pub fn aggregate(sources: &UserSources) -> Vec<UserRecord> {
    let mut vehicles_by_owner = group_by(&sources.vehicles, |v| v.owner.clone());
    let mut pins_by_owner = group_by(&sources.pins, |p| p.owner.clone());
    let subscription_groups = group_by(&sources.subscriptions, |s| Some(subscription_owner(s)));

    let subscriptions = claim_subscriptions(&sources.accounts, subscription_groups);

    sources
        .accounts
        .iter()
        .zip(subscriptions)
        .enumerate()
        .map(|(position, (account, subs))| {
            let key = account.id.as_str();
            let vehicles = vehicles_by_owner.remove(key).unwrap_or_default();
            let pins = pins_by_owner.remove(key).unwrap_or_default();

            UserRecord {
                index: position + 1,
                id: account.id.clone(),
                name: or_na(account.name.as_deref()),
                email: or_na(account.email.as_deref()),
                phone: or_na(account.phone.as_deref()),
                status: account.status,
                joined: format_date(account.joined.as_ref()),
                last_active: format_date(account.last_active.as_ref()),
                image: account.image.clone(),
                total_spots: or_na(account.total_spots.as_deref()),
                subscription_summary: or_na(account.subscription.as_deref()),
                has_device_token: account.device_token.is_some(),
                vehicles: vehicles.iter().map(VehicleView::from).collect(),
                pins: pins.iter().map(PinView::from).collect(),
                subscriptions: subs.iter().map(SubscriptionView::from).collect(),
            }
        })
        .collect()
}
