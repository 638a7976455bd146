//! Vehicle (`myCars` collection).

use spot_my_ride_core::VehicleId;

use super::RawDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vehicle {
    pub id: VehicleId,
    /// Owning account key (`userId`).
    pub owner: Option<String>,
    pub name: Option<String>,
    pub plate_number: Option<String>,
    pub color: Option<String>,
    pub added: Option<RawDate>,
    /// Image URLs in display order.
    pub images: Vec<String>,
}
