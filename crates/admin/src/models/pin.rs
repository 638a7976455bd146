//! Pinned parking location (`pinnedCars` collection).

use super::RawDate;

/// Copy of the vehicle as it was when the location was pinned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleSnapshot {
    pub car_id: Option<String>,
    pub name: Option<String>,
    pub plate_number: Option<String>,
    pub color: Option<String>,
    pub added: Option<RawDate>,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedLocation {
    pub pin_car_id: Option<String>,
    /// Owning account key (`userId`).
    pub owner: Option<String>,
    pub description: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub pinned: Option<RawDate>,
    pub vehicle: VehicleSnapshot,
}
