//! Party repository.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use gledger_core::ledger::validate_label;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QuerySelect, Set,
};

use crate::entities::parties;
use crate::error::StoreError;
use crate::store;

/// Party repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct PartyRepository {
    db: DatabaseConnection,
}

impl PartyRepository {
    /// Creates a new party repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a party under a caller-assigned id.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad name, or a database error if the
    /// id is already taken within the tenant.
    pub async fn create(
        &self,
        tenant: i64,
        party_id: i64,
        party_name: String,
    ) -> Result<parties::Model, StoreError> {
        validate_label("party_name", &party_name)?;

        let now = Utc::now().fixed_offset();
        let model = parties::ActiveModel {
            mservice_id: Set(tenant),
            party_id: Set(party_id),
            party_name: Set(party_name),
            created: Set(now),
            modified: Set(now),
            deleted: Set(None),
            is_deleted: Set(false),
            version: Set(1),
        };

        Ok(model.insert(&self.db).await?)
    }

    /// Renames a party, returning the new version.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` on a version or liveness mismatch.
    pub async fn update(
        &self,
        tenant: i64,
        party_id: i64,
        version: i32,
        party_name: String,
    ) -> Result<i32, StoreError> {
        validate_label("party_name", &party_name)?;

        store::update::<parties::Entity, _>(
            &self.db,
            tenant,
            party_id,
            version,
            vec![store::set::<parties::Entity, _>(
                parties::Column::PartyName,
                party_name,
            )],
        )
        .await
    }

    /// Soft-deletes a party, returning the new version.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` on a version or liveness mismatch.
    pub async fn delete(&self, tenant: i64, party_id: i64, version: i32) -> Result<i32, StoreError> {
        store::soft_delete::<parties::Entity, _>(&self.db, tenant, party_id, version).await
    }

    /// Gets a live party.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no live row.
    pub async fn get(&self, tenant: i64, party_id: i64) -> Result<parties::Model, StoreError> {
        store::get_live::<parties::Entity, _>(&self.db, tenant, party_id).await
    }

    /// Lists the tenant's live parties.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, tenant: i64) -> Result<Vec<parties::Model>, StoreError> {
        Ok(store::list_live::<parties::Entity, _>(&self.db, tenant).await?)
    }
}

/// Resolves party names for a set of ids in one query.
///
/// Deleted parties are included; historical transactions still name them.
pub(crate) async fn party_names<C: ConnectionTrait>(
    conn: &C,
    tenant: i64,
    ids: HashSet<i64>,
) -> Result<HashMap<i64, String>, DbErr> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(i64, String)> = parties::Entity::find()
        .select_only()
        .column(parties::Column::PartyId)
        .column(parties::Column::PartyName)
        .filter(parties::Column::MserviceId.eq(tenant))
        .filter(parties::Column::PartyId.is_in(ids))
        .into_tuple()
        .all(conn)
        .await?;

    Ok(rows.into_iter().collect())
}
