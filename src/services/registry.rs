//! Organizational registry: business units, regions, clients, sites and
//! technicians. Plain CRUD with name-uniqueness checks; the hierarchy
//! links are nullable on sites and technicians and validated on write.

use crate::{
    db::DbPool,
    entities::{business_unit, client, region, site, technician},
    errors::ServiceError,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateSite {
    pub name: String,
    pub client_id: Option<Uuid>,
    pub region_id: Option<Uuid>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct UpdateSite {
    pub name: Option<String>,
    pub client_id: Option<Option<Uuid>>,
    pub region_id: Option<Option<Uuid>>,
    pub address: Option<Option<String>>,
    pub latitude: Option<Option<f64>>,
    pub longitude: Option<Option<f64>>,
}

#[derive(Debug, Clone)]
pub struct CreateClient {
    pub name: String,
    pub business_unit_id: Uuid,
    pub contact_person: Option<String>,
    pub contact_number: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateTechnician {
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub business_unit_id: Option<Uuid>,
}

#[derive(Clone)]
pub struct RegistryService {
    db_pool: Arc<DbPool>,
}

impl RegistryService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    fn require_name(name: &str, what: &str) -> Result<(), ServiceError> {
        if name.trim().is_empty() {
            return Err(ServiceError::InvalidInput(format!(
                "{} name is required",
                what
            )));
        }
        Ok(())
    }

    // --- business units ---

    #[instrument(skip(self))]
    pub async fn create_business_unit(
        &self,
        name: String,
    ) -> Result<business_unit::Model, ServiceError> {
        Self::require_name(&name, "business unit")?;
        let db = self.db_pool.as_ref();

        let duplicate = business_unit::Entity::find()
            .filter(business_unit::Column::Name.eq(name.clone()))
            .one(db)
            .await?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "business unit '{}' already exists",
                name
            )));
        }

        let unit = business_unit::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await?;
        Ok(unit)
    }

    #[instrument(skip(self))]
    pub async fn list_business_units(&self) -> Result<Vec<business_unit::Model>, ServiceError> {
        let units = business_unit::Entity::find()
            .order_by_asc(business_unit::Column::Name)
            .all(self.db_pool.as_ref())
            .await?;
        Ok(units)
    }

    #[instrument(skip(self))]
    pub async fn get_business_unit(
        &self,
        id: Uuid,
    ) -> Result<Option<business_unit::Model>, ServiceError> {
        let unit = business_unit::Entity::find_by_id(id)
            .one(self.db_pool.as_ref())
            .await?;
        Ok(unit)
    }

    /// Refuses deletion while clients still reference the unit.
    #[instrument(skip(self))]
    pub async fn delete_business_unit(&self, id: Uuid) -> Result<(), ServiceError> {
        let db = self.db_pool.as_ref();
        let unit = business_unit::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("business unit {} not found", id)))?;

        let in_use = client::Entity::find()
            .filter(client::Column::BusinessUnitId.eq(id))
            .one(db)
            .await?;
        if in_use.is_some() {
            return Err(ServiceError::Conflict(
                "business unit still has clients assigned".to_string(),
            ));
        }
        unit.delete(db).await?;
        Ok(())
    }

    // --- regions ---

    #[instrument(skip(self))]
    pub async fn create_region(&self, name: String) -> Result<region::Model, ServiceError> {
        Self::require_name(&name, "region")?;
        let db = self.db_pool.as_ref();

        let duplicate = region::Entity::find()
            .filter(region::Column::Name.eq(name.clone()))
            .one(db)
            .await?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "region '{}' already exists",
                name
            )));
        }

        let region = region::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await?;
        Ok(region)
    }

    #[instrument(skip(self))]
    pub async fn list_regions(&self) -> Result<Vec<region::Model>, ServiceError> {
        let regions = region::Entity::find()
            .order_by_asc(region::Column::Name)
            .all(self.db_pool.as_ref())
            .await?;
        Ok(regions)
    }

    // --- clients ---

    #[instrument(skip(self))]
    pub async fn create_client(
        &self,
        command: CreateClient,
    ) -> Result<client::Model, ServiceError> {
        Self::require_name(&command.name, "client")?;
        let db = self.db_pool.as_ref();

        let unit = business_unit::Entity::find_by_id(command.business_unit_id)
            .one(db)
            .await?;
        if unit.is_none() {
            return Err(ServiceError::InvalidInput(format!(
                "business unit {} does not exist",
                command.business_unit_id
            )));
        }

        let duplicate = client::Entity::find()
            .filter(client::Column::Name.eq(command.name.clone()))
            .one(db)
            .await?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "client '{}' already exists",
                command.name
            )));
        }

        let client = client::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(command.name),
            business_unit_id: Set(command.business_unit_id),
            contact_person: Set(command.contact_person),
            contact_number: Set(command.contact_number),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await?;
        Ok(client)
    }

    #[instrument(skip(self))]
    pub async fn list_clients(&self) -> Result<Vec<client::Model>, ServiceError> {
        let clients = client::Entity::find()
            .order_by_asc(client::Column::Name)
            .all(self.db_pool.as_ref())
            .await?;
        Ok(clients)
    }

    #[instrument(skip(self))]
    pub async fn get_client(&self, id: Uuid) -> Result<Option<client::Model>, ServiceError> {
        let client = client::Entity::find_by_id(id)
            .one(self.db_pool.as_ref())
            .await?;
        Ok(client)
    }

    // --- sites ---

    #[instrument(skip(self))]
    pub async fn create_site(&self, command: CreateSite) -> Result<site::Model, ServiceError> {
        Self::require_name(&command.name, "site")?;
        let db = self.db_pool.as_ref();

        if let Some(client_id) = command.client_id {
            if client::Entity::find_by_id(client_id).one(db).await?.is_none() {
                return Err(ServiceError::InvalidInput(format!(
                    "client {} does not exist",
                    client_id
                )));
            }
        }
        if let Some(region_id) = command.region_id {
            if region::Entity::find_by_id(region_id).one(db).await?.is_none() {
                return Err(ServiceError::InvalidInput(format!(
                    "region {} does not exist",
                    region_id
                )));
            }
        }

        let site = site::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(command.name),
            client_id: Set(command.client_id),
            region_id: Set(command.region_id),
            address: Set(command.address),
            latitude: Set(command.latitude),
            longitude: Set(command.longitude),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await?;
        Ok(site)
    }

    /// Partial update. Outer `None` leaves a field untouched; inner `None`
    /// clears a nullable link.
    #[instrument(skip(self))]
    pub async fn update_site(
        &self,
        id: Uuid,
        command: UpdateSite,
    ) -> Result<site::Model, ServiceError> {
        let db = self.db_pool.as_ref();

        let site = site::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("site {} not found", id)))?;

        if let Some(Some(client_id)) = command.client_id {
            if client::Entity::find_by_id(client_id).one(db).await?.is_none() {
                return Err(ServiceError::InvalidInput(format!(
                    "client {} does not exist",
                    client_id
                )));
            }
        }
        if let Some(Some(region_id)) = command.region_id {
            if region::Entity::find_by_id(region_id).one(db).await?.is_none() {
                return Err(ServiceError::InvalidInput(format!(
                    "region {} does not exist",
                    region_id
                )));
            }
        }

        let mut active: site::ActiveModel = site.into();
        if let Some(name) = command.name {
            Self::require_name(&name, "site")?;
            active.name = Set(name);
        }
        if let Some(client_id) = command.client_id {
            active.client_id = Set(client_id);
        }
        if let Some(region_id) = command.region_id {
            active.region_id = Set(region_id);
        }
        if let Some(address) = command.address {
            active.address = Set(address);
        }
        if let Some(latitude) = command.latitude {
            active.latitude = Set(latitude);
        }
        if let Some(longitude) = command.longitude {
            active.longitude = Set(longitude);
        }
        let updated = match active.update(db).await {
            Ok(updated) => updated,
            Err(DbErr::RecordNotUpdated) => {
                // Row changed hands between the fetch and the write
                let still_exists = site::Entity::find_by_id(id).one(db).await?.is_some();
                return Err(super::stale_update_error(still_exists, "site", id));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn list_sites(
        &self,
        client_id: Option<Uuid>,
    ) -> Result<Vec<site::Model>, ServiceError> {
        let mut query = site::Entity::find().order_by_asc(site::Column::Name);
        if let Some(client_id) = client_id {
            query = query.filter(site::Column::ClientId.eq(client_id));
        }
        let sites = query.all(self.db_pool.as_ref()).await?;
        Ok(sites)
    }

    #[instrument(skip(self))]
    pub async fn get_site(&self, id: Uuid) -> Result<Option<site::Model>, ServiceError> {
        let site = site::Entity::find_by_id(id)
            .one(self.db_pool.as_ref())
            .await?;
        Ok(site)
    }

    // --- technicians ---

    #[instrument(skip(self))]
    pub async fn create_technician(
        &self,
        command: CreateTechnician,
    ) -> Result<technician::Model, ServiceError> {
        Self::require_name(&command.full_name, "technician")?;
        let db = self.db_pool.as_ref();

        if let Some(unit_id) = command.business_unit_id {
            if business_unit::Entity::find_by_id(unit_id)
                .one(db)
                .await?
                .is_none()
            {
                return Err(ServiceError::InvalidInput(format!(
                    "business unit {} does not exist",
                    unit_id
                )));
            }
        }

        let technician = technician::ActiveModel {
            id: Set(Uuid::new_v4()),
            full_name: Set(command.full_name),
            email: Set(command.email),
            phone: Set(command.phone),
            business_unit_id: Set(command.business_unit_id),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await?;
        Ok(technician)
    }

    #[instrument(skip(self))]
    pub async fn list_technicians(&self) -> Result<Vec<technician::Model>, ServiceError> {
        let technicians = technician::Entity::find()
            .order_by_asc(technician::Column::FullName)
            .all(self.db_pool.as_ref())
            .await?;
        Ok(technicians)
    }

    #[instrument(skip(self))]
    pub async fn delete_technician(&self, id: Uuid) -> Result<(), ServiceError> {
        let db = self.db_pool.as_ref();
        let technician = technician::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("technician {} not found", id)))?;
        technician.delete(db).await?;
        Ok(())
    }
}
