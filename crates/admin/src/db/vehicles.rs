//! Vehicle repository (`myCars` collection).

use spot_my_ride_core::VehicleId;

use super::{RepositoryError, raw_date, text};
use crate::models::Vehicle;
use crate::store::{Document, DocumentStore, FieldsExt, collections};

impl From<&Document> for Vehicle {
    fn from(doc: &Document) -> Self {
        let fields = &doc.fields;
        Self {
            id: VehicleId::new(doc.id()),
            owner: text(fields, "userId"),
            name: text(fields, "name"),
            plate_number: text(fields, "plateNumber"),
            color: text(fields, "color"),
            added: raw_date(fields, "carAddedTime"),
            images: fields.string_array_field("images"),
        }
    }
}

/// Repository for vehicles.
pub struct VehicleRepository<'a> {
    store: &'a DocumentStore,
}

impl<'a> VehicleRepository<'a> {
    #[must_use]
    pub const fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// List every vehicle.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the scan fails.
    pub async fn list_all(&self) -> Result<Vec<Vehicle>, RepositoryError> {
        let docs = self.store.list(collections::VEHICLES).await?;
        Ok(docs.iter().map(Vehicle::from).collect())
    }
}
