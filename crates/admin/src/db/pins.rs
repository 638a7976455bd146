//! Pinned location repository (`pinnedCars` collection).

use super::{RepositoryError, raw_date, text};
use crate::models::{PinnedLocation, VehicleSnapshot};
use crate::store::{Document, DocumentStore, Fields, FieldsExt, collections};

impl From<&Fields> for VehicleSnapshot {
    fn from(fields: &Fields) -> Self {
        Self {
            car_id: text(fields, "carId"),
            name: text(fields, "name"),
            plate_number: text(fields, "plateNumber"),
            color: text(fields, "color"),
            added: raw_date(fields, "carAddedTime"),
            images: fields.string_array_field("images"),
        }
    }
}

impl From<&Document> for PinnedLocation {
    fn from(doc: &Document) -> Self {
        let fields = &doc.fields;
        Self {
            pin_car_id: text(fields, "pinCarId"),
            owner: text(fields, "userId"),
            description: text(fields, "description"),
            latitude: text(fields, "latitude"),
            longitude: text(fields, "longitude"),
            pinned: raw_date(fields, "carPinnedTime"),
            vehicle: fields
                .map_field("selectedCar")
                .map(VehicleSnapshot::from)
                .unwrap_or_default(),
        }
    }
}

/// Repository for pinned locations.
pub struct PinRepository<'a> {
    store: &'a DocumentStore,
}

impl<'a> PinRepository<'a> {
    #[must_use]
    pub const fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// List every pinned location.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the scan fails.
    pub async fn list_all(&self) -> Result<Vec<PinnedLocation>, RepositoryError> {
        let docs = self.store.list(collections::PINS).await?;
        Ok(docs.iter().map(PinnedLocation::from).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::Value;

    #[test]
    fn test_snapshot_is_decoded_from_map() {
        let mut car = Fields::new();
        car.insert("carId".into(), Value::string("car-1"));
        car.insert("plateNumber".into(), Value::string("KHI-123"));
        let mut fields = Fields::new();
        fields.insert("userId".into(), Value::string("u1"));
        fields.insert("selectedCar".into(), Value::from(car));
        fields.insert("latitude".into(), Value::DoubleValue(24.86));

        let pin = PinnedLocation::from(&Document {
            name: "x/pinnedCars/p1".to_string(),
            fields,
            create_time: None,
            update_time: None,
        });
        assert_eq!(pin.vehicle.car_id.as_deref(), Some("car-1"));
        assert_eq!(pin.vehicle.plate_number.as_deref(), Some("KHI-123"));
        assert_eq!(pin.latitude.as_deref(), Some("24.86"));
        assert_eq!(pin.owner.as_deref(), Some("u1"));
    }

    #[test]
    fn test_missing_snapshot_is_empty() {
        let pin = PinnedLocation::from(&Document {
            name: "x/pinnedCars/p2".to_string(),
            fields: Fields::new(),
            create_time: None,
            update_time: None,
        });
        assert_eq!(pin.vehicle, VehicleSnapshot::default());
    }
}
