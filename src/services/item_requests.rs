use super::notifications::{new_request_message, notify_superusers, notify_user, status_change_message, NEW_REQUEST_SUBJECT};
use crate::{
    auth::AuthUser,
    db::DbPool,
    entities::{
        item,
        item_request::{self, Entity as RequestEntity, RequestStatus},
    },
    errors::{FieldErrors, ServiceError},
};
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, EntityTrait, PaginatorTrait, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

fn validate_request_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price < dec!(0.01) {
        let mut err = ValidationError::new("unit_price");
        err.message = Some("must be at least 0.01".into());
        return Err(err);
    }
    Ok(())
}

/// A new item request. With `item_id`, unset descriptive fields are copied from that item.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateItemRequest {
    pub item_id: Option<i32>,
    #[validate(length(min = 1, max = 50, message = "must be 1-50 characters"))]
    pub manufacturer: Option<String>,
    #[validate(length(min = 1, max = 201, message = "must be 1-201 characters"))]
    pub model_part_num: Option<String>,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub quantity_requested: i32,
    pub description: Option<String>,
    #[validate(custom = "validate_request_price")]
    #[schema(value_type = Option<String>, example = "12.50")]
    pub unit_price: Option<Decimal>,
}

/// Resolved request fields after prefill. Missing required fields are reported together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFields {
    pub manufacturer: String,
    pub model_part_num: String,
    pub description: String,
    pub unit_price: Decimal,
}

pub fn resolve_fields(
    input: &CreateItemRequest,
    source: Option<&item::Model>,
) -> Result<RequestFields, ServiceError> {
    let manufacturer = input
        .manufacturer
        .clone()
        .or_else(|| source.map(|i| i.manufacturer.clone()));
    let model_part_num = input
        .model_part_num
        .clone()
        .or_else(|| source.map(|i| i.model_part_num()));

    let mut errors = FieldErrors::new();
    if manufacturer.is_none() {
        errors.add("manufacturer", "is required");
    }
    if model_part_num.is_none() {
        errors.add("model_part_num", "is required");
    }
    errors.into_result()?;

    Ok(RequestFields {
        manufacturer: manufacturer.unwrap_or_default(),
        model_part_num: model_part_num.unwrap_or_default(),
        description: input
            .description
            .clone()
            .or_else(|| source.map(|i| i.description.clone()))
            .unwrap_or_default(),
        unit_price: input
            .unit_price
            .or_else(|| source.map(|i| i.unit_price.max(dec!(0.01))))
            .unwrap_or(dec!(0.01)),
    })
}

#[derive(Clone)]
pub struct ItemRequestService {
    db_pool: Arc<DbPool>,
}

impl ItemRequestService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Oldest first.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<item_request::Model>, u64), ServiceError> {
        let paginator = RequestEntity::find()
            .order_by_asc(item_request::Column::Timestamp)
            .order_by_asc(item_request::Column::Id)
            .paginate(&*self.db_pool, per_page);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((rows, total))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<item_request::Model, ServiceError> {
        RequestEntity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Item request {}", id)))
    }

    #[instrument(skip(self, input), fields(actor = %actor.username))]
    pub async fn create(
        &self,
        actor: &AuthUser,
        input: CreateItemRequest,
    ) -> Result<item_request::Model, ServiceError> {
        input.validate()?;

        let txn = self.db_pool.begin().await?;
        let source = match input.item_id {
            Some(item_id) => Some(
                item::Entity::find_by_id(item_id)
                    .one(&txn)
                    .await?
                    .ok_or_else(|| ServiceError::NotFound(format!("Item {}", item_id)))?,
            ),
            None => None,
        };
        let fields = resolve_fields(&input, source.as_ref())?;

        let saved = item_request::ActiveModel {
            manufacturer: Set(fields.manufacturer),
            model_part_num: Set(fields.model_part_num),
            quantity_requested: Set(input.quantity_requested),
            description: Set(fields.description),
            unit_price: Set(fields.unit_price),
            item_id: Set(input.item_id),
            requested_by: Set(actor.id),
            timestamp: Set(Utc::now()),
            status: Set(RequestStatus::Pending),
            status_changed_by: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        notify_superusers(
            &txn,
            NEW_REQUEST_SUBJECT,
            &new_request_message(&saved.manufacturer, &saved.model_part_num),
        )
        .await?;
        txn.commit().await?;

        info!(request_id = saved.id, "item request submitted");
        Ok(saved)
    }

    /// Moves a pending request to `status` and tells the requester.
    #[instrument(skip(self), fields(actor = %actor.username))]
    pub async fn review(
        &self,
        actor: &AuthUser,
        id: i32,
        status: RequestStatus,
    ) -> Result<item_request::Model, ServiceError> {
        if status == RequestStatus::Pending {
            return Err(ServiceError::BadRequest(
                "A request can only be accepted or rejected".to_string(),
            ));
        }

        let txn = self.db_pool.begin().await?;
        let found = RequestEntity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Item request {}", id)))?;
        if found.status != RequestStatus::Pending {
            return Err(ServiceError::Conflict(format!(
                "Item request {} is already {}",
                id, found.status
            )));
        }

        let mut active: item_request::ActiveModel = found.into();
        active.status = Set(status);
        active.status_changed_by = Set(Some(actor.id));
        let saved = active.update(&txn).await?;

        notify_user(
            &txn,
            saved.requested_by,
            &format!("Item Request {}", status),
            &status_change_message(
                &saved.manufacturer,
                &saved.model_part_num,
                &status.to_string(),
                &actor.username,
            ),
        )
        .await?;
        txn.commit().await?;

        info!(request_id = id, %status, "item request reviewed");
        Ok(saved)
    }

    #[instrument(skip(self), fields(actor = %actor.username))]
    pub async fn delete(&self, actor: &AuthUser, id: i32) -> Result<(), ServiceError> {
        let found = self.get(id).await?;
        if found.requested_by != actor.id {
            return Err(ServiceError::Forbidden(
                "Only the requester may delete an item request".to_string(),
            ));
        }
        RequestEntity::delete_by_id(found.id)
            .exec(&*self.db_pool)
            .await?;
        Ok(())
    }
}
