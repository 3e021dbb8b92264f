//! Item lifecycle: create, update, delete, use. Each mutation writes its history row and any
//! low-stock notifications in the same transaction, then refreshes the search index once the
//! transaction has committed.

use super::notifications::notify_if_low_stock;
use super::search::SearchIndex;
use crate::{
    auth::{check_item_fields, AuthUser},
    db::DbPool,
    entities::{
        item::{self, Entity as ItemEntity, PartOrUnit},
        item_history::{self, HistoryAction},
        item_request, used_item,
    },
    errors::{FieldErrors, ServiceError},
};
use chrono::Utc;
use metrics::counter;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

pub const DEFAULT_TEXT: &str = "N/A";
pub const CREATED_CHANGES: &str = "Created and added to the database.";

fn validate_unit_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        let mut err = ValidationError::new("unit_price");
        err.message = Some("must be zero or greater".into());
        return Err(err);
    }
    if price.scale() > 2 && price.round_dp(2) != *price {
        let mut err = ValidationError::new("unit_price");
        err.message = Some("must have at most 2 decimal places".into());
        return Err(err);
    }
    Ok(())
}

/// Item fields as submitted. Absent fields take defaults on create and stay untouched on update;
/// the set of present fields decides which permissions the payload needs.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct ItemInput {
    #[validate(length(min = 1, max = 50, message = "must be 1-50 characters"))]
    pub manufacturer: Option<String>,
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub model: Option<String>,
    pub part_or_unit: Option<PartOrUnit>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub part_number: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 50, message = "must be 1-50 characters"))]
    pub location: Option<String>,
    #[validate(range(min = 0, message = "must be zero or greater"))]
    pub quantity: Option<i32>,
    #[validate(range(min = 0, message = "must be zero or greater"))]
    pub min_quantity: Option<i32>,
    #[validate(custom = "validate_unit_price")]
    #[schema(value_type = Option<String>, example = "12.50")]
    pub unit_price: Option<Decimal>,
}

impl ItemInput {
    /// Names of the fields this payload carries, in column order.
    pub fn present_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.manufacturer.is_some() {
            fields.push("manufacturer");
        }
        if self.model.is_some() {
            fields.push("model");
        }
        if self.part_or_unit.is_some() {
            fields.push("part_or_unit");
        }
        if self.part_number.is_some() {
            fields.push("part_number");
        }
        if self.description.is_some() {
            fields.push("description");
        }
        if self.location.is_some() {
            fields.push("location");
        }
        if self.quantity.is_some() {
            fields.push("quantity");
        }
        if self.min_quantity.is_some() {
            fields.push("min_quantity");
        }
        if self.unit_price.is_some() {
            fields.push("unit_price");
        }
        fields
    }

    fn into_new_active_model(self, default_min_quantity: i32, actor: Option<i32>) -> item::ActiveModel {
        item::ActiveModel {
            manufacturer: Set(self.manufacturer.unwrap_or_else(|| DEFAULT_TEXT.to_string())),
            model: Set(self.model.unwrap_or_else(|| DEFAULT_TEXT.to_string())),
            part_or_unit: Set(self.part_or_unit.unwrap_or_default()),
            part_number: Set(self.part_number.unwrap_or_default()),
            description: Set(self.description.unwrap_or_default()),
            location: Set(self.location.unwrap_or_else(|| DEFAULT_TEXT.to_string())),
            quantity: Set(self.quantity.unwrap_or(0)),
            min_quantity: Set(self.min_quantity.unwrap_or(default_min_quantity)),
            unit_price: Set(self.unit_price.unwrap_or(dec!(0.01))),
            last_modified_by: Set(actor),
            ..Default::default()
        }
    }
}

/// `field: 'old' has been changed to 'new'` for every present field whose value differs.
pub fn describe_changes(current: &item::Model, input: &ItemInput) -> Vec<String> {
    let mut changes = Vec::new();
    let mut push = |field: &str, old: String, new: String| {
        if old != new {
            changes.push(format!("{}: '{}' has been changed to '{}'", field, old, new));
        }
    };

    if let Some(v) = &input.manufacturer {
        push("manufacturer", current.manufacturer.clone(), v.clone());
    }
    if let Some(v) = &input.model {
        push("model", current.model.clone(), v.clone());
    }
    if let Some(v) = input.part_or_unit {
        push("part_or_unit", current.part_or_unit.to_string(), v.to_string());
    }
    if let Some(v) = &input.part_number {
        push("part_number", current.part_number.clone(), v.clone());
    }
    if let Some(v) = &input.description {
        push("description", current.description.clone(), v.clone());
    }
    if let Some(v) = &input.location {
        push("location", current.location.clone(), v.clone());
    }
    if let Some(v) = input.quantity {
        push("quantity", current.quantity.to_string(), v.to_string());
    }
    if let Some(v) = input.min_quantity {
        push("min_quantity", current.min_quantity.to_string(), v.to_string());
    }
    if let Some(v) = input.unit_price {
        // Compare at two places so 5 and 5.00 are the same price.
        push(
            "unit_price",
            format!("{:.2}", current.unit_price),
            format!("{:.2}", v),
        );
    }
    changes
}

/// Item as served over the API, with the derived low-stock flag.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ItemResponse {
    pub id: i32,
    pub manufacturer: String,
    pub model: String,
    pub part_or_unit: PartOrUnit,
    pub part_number: String,
    pub description: String,
    pub location: String,
    pub quantity: i32,
    pub min_quantity: i32,
    #[schema(value_type = String, example = "12.50")]
    pub unit_price: Decimal,
    pub low_stock: bool,
    pub last_modified_by: Option<i32>,
    pub created_at: chrono::DateTime<Utc>,
    pub updated_at: chrono::DateTime<Utc>,
}

impl From<item::Model> for ItemResponse {
    fn from(m: item::Model) -> Self {
        let low_stock = m.low_stock();
        Self {
            id: m.id,
            manufacturer: m.manufacturer,
            model: m.model,
            part_or_unit: m.part_or_unit,
            part_number: m.part_number,
            description: m.description,
            location: m.location,
            quantity: m.quantity,
            min_quantity: m.min_quantity,
            unit_price: m.unit_price,
            low_stock,
            last_modified_by: m.last_modified_by,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ItemFilter {
    /// Only items below (true) or at/above (false) their threshold
    pub low_stock: Option<bool>,
    pub part_or_unit: Option<PartOrUnit>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct UseItemInput {
    pub item_id: i32,
    #[validate(range(min = 1, message = "must be a positive work order number"))]
    pub work_order: i32,
}

pub struct SearchOutcome {
    pub items: Vec<item::Model>,
    pub suggestion: Option<String>,
}

pub async fn record_history<C: ConnectionTrait>(
    conn: &C,
    item_id: i32,
    action: HistoryAction,
    user_id: Option<i32>,
    changes: String,
) -> Result<item_history::Model, ServiceError> {
    Ok(item_history::ActiveModel {
        item_id: Set(item_id),
        action: Set(action),
        user_id: Set(user_id),
        changes: Set(changes),
        timestamp: Set(Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await?)
}

/// Inserts a validated item with its create history and low-stock alerts.
async fn insert_item<C: ConnectionTrait>(
    conn: &C,
    input: ItemInput,
    default_min_quantity: i32,
    actor: Option<i32>,
) -> Result<item::Model, ServiceError> {
    let saved = input
        .into_new_active_model(default_min_quantity, actor)
        .insert(conn)
        .await?;
    record_history(conn, saved.id, HistoryAction::Create, actor, CREATED_CHANGES.to_string())
        .await?;
    notify_if_low_stock(conn, &saved).await?;
    Ok(saved)
}

#[derive(Clone)]
pub struct ItemService {
    db_pool: Arc<DbPool>,
    search: Arc<SearchIndex>,
    default_min_quantity: i32,
    max_search_results: usize,
}

impl ItemService {
    pub fn new(
        db_pool: Arc<DbPool>,
        search: Arc<SearchIndex>,
        default_min_quantity: i32,
        max_search_results: usize,
    ) -> Self {
        Self {
            db_pool,
            search,
            default_min_quantity,
            max_search_results,
        }
    }

    /// Index refreshes run after commit; a failure leaves the row saved and is only logged.
    async fn reindex(&self, items: &[item::Model]) {
        if let Err(e) = self.search.index_items(items).await {
            error!(error = %e, count = items.len(), "search index update failed; run `reindex` to repair");
        }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: &ItemFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<item::Model>, u64), ServiceError> {
        let db = &*self.db_pool;
        let mut query = ItemEntity::find();

        match filter.low_stock {
            Some(true) => {
                query = query.filter(
                    Expr::col(item::Column::Quantity).lt(Expr::col(item::Column::MinQuantity)),
                )
            }
            Some(false) => {
                query = query.filter(
                    Expr::col(item::Column::Quantity).gte(Expr::col(item::Column::MinQuantity)),
                )
            }
            None => {}
        }
        if let Some(kind) = filter.part_or_unit {
            query = query.filter(item::Column::PartOrUnit.eq(kind));
        }
        if let Some(location) = &filter.location {
            query = query.filter(item::Column::Location.eq(location.as_str()));
        }

        let paginator = query
            .order_by_asc(item::Column::Manufacturer)
            .order_by_asc(item::Column::Model)
            .order_by_asc(item::Column::PartNumber)
            .order_by_asc(item::Column::Id)
            .paginate(db, per_page);

        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<item::Model, ServiceError> {
        ItemEntity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Item {}", id)))
    }

    /// Relevance-ordered matches plus a spelling suggestion.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<SearchOutcome, ServiceError> {
        counter!("inventory.search.queries", 1);

        let hits = self.search.search(query, self.max_search_results)?;
        let suggestion = if query.trim().is_empty() {
            None
        } else {
            self.search.suggest(query)?
        };

        if hits.is_empty() {
            return Ok(SearchOutcome {
                items: Vec::new(),
                suggestion,
            });
        }

        let ids: Vec<i32> = hits.iter().map(|h| h.item_id).collect();
        let mut by_id: HashMap<i32, item::Model> = ItemEntity::find()
            .filter(item::Column::Id.is_in(ids.clone()))
            .all(&*self.db_pool)
            .await?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();

        let items = ids.into_iter().filter_map(|id| by_id.remove(&id)).collect();
        Ok(SearchOutcome { items, suggestion })
    }

    #[instrument(skip(self, input), fields(actor = %actor.username))]
    pub async fn create(
        &self,
        actor: &AuthUser,
        input: ItemInput,
    ) -> Result<item::Model, ServiceError> {
        input.validate()?;
        check_item_fields(actor.role, &input.present_fields(), true)?;

        let txn = self.db_pool.begin().await?;
        let saved = insert_item(&txn, input, self.default_min_quantity, Some(actor.id)).await?;
        txn.commit().await?;

        counter!("inventory.items.created", 1);
        info!(item_id = saved.id, "item created");
        self.reindex(std::slice::from_ref(&saved)).await;
        Ok(saved)
    }

    /// Applies the present fields. A payload that changes nothing writes nothing.
    #[instrument(skip(self, input), fields(actor = %actor.username))]
    pub async fn update(
        &self,
        actor: &AuthUser,
        id: i32,
        input: ItemInput,
    ) -> Result<item::Model, ServiceError> {
        input.validate()?;
        check_item_fields(actor.role, &input.present_fields(), false)?;

        let txn = self.db_pool.begin().await?;
        let current = ItemEntity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Item {}", id)))?;

        let changes = describe_changes(&current, &input);
        if changes.is_empty() {
            txn.rollback().await?;
            return Ok(current);
        }

        let mut active: item::ActiveModel = current.into();
        if let Some(v) = input.manufacturer {
            active.manufacturer = Set(v);
        }
        if let Some(v) = input.model {
            active.model = Set(v);
        }
        if let Some(v) = input.part_or_unit {
            active.part_or_unit = Set(v);
        }
        if let Some(v) = input.part_number {
            active.part_number = Set(v);
        }
        if let Some(v) = input.description {
            active.description = Set(v);
        }
        if let Some(v) = input.location {
            active.location = Set(v);
        }
        if let Some(v) = input.quantity {
            active.quantity = Set(v);
        }
        if let Some(v) = input.min_quantity {
            active.min_quantity = Set(v);
        }
        if let Some(v) = input.unit_price {
            active.unit_price = Set(v);
        }
        active.last_modified_by = Set(Some(actor.id));

        let saved = active.update(&txn).await?;
        record_history(
            &txn,
            saved.id,
            HistoryAction::Update,
            Some(actor.id),
            changes.join(", "),
        )
        .await?;
        notify_if_low_stock(&txn, &saved).await?;
        txn.commit().await?;

        self.reindex(std::slice::from_ref(&saved)).await;
        Ok(saved)
    }

    /// Removes the item with its history and usage records; requests pointing at it are unlinked.
    #[instrument(skip(self), fields(actor = %actor.username))]
    pub async fn delete(&self, actor: &AuthUser, id: i32) -> Result<(), ServiceError> {
        let txn = self.db_pool.begin().await?;
        let found = ItemEntity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Item {}", id)))?;

        item_history::Entity::delete_many()
            .filter(item_history::Column::ItemId.eq(found.id))
            .exec(&txn)
            .await?;
        used_item::Entity::delete_many()
            .filter(used_item::Column::ItemId.eq(found.id))
            .exec(&txn)
            .await?;
        item_request::Entity::update_many()
            .col_expr(item_request::Column::ItemId, Expr::value(Option::<i32>::None))
            .filter(item_request::Column::ItemId.eq(found.id))
            .exec(&txn)
            .await?;
        ItemEntity::delete_by_id(found.id).exec(&txn).await?;
        txn.commit().await?;

        counter!("inventory.items.deleted", 1);
        info!(item_id = id, "item deleted");
        if let Err(e) = self.search.remove_item(id).await {
            error!(error = %e, item_id = id, "search index removal failed");
        }
        Ok(())
    }

    /// Newest first.
    #[instrument(skip(self))]
    pub async fn history(&self, id: i32) -> Result<Vec<item_history::Model>, ServiceError> {
        self.get(id).await?;
        Ok(item_history::Entity::find()
            .filter(item_history::Column::ItemId.eq(id))
            .order_by_desc(item_history::Column::Timestamp)
            .order_by_desc(item_history::Column::Id)
            .all(&*self.db_pool)
            .await?)
    }

    /// Inserts every row or none. Row numbers in errors are spreadsheet rows.
    #[instrument(skip(self, rows), fields(actor = %actor.username, rows = rows.len()))]
    pub async fn import(
        &self,
        actor: &AuthUser,
        rows: Vec<(usize, ItemInput)>,
    ) -> Result<Vec<item::Model>, ServiceError> {
        let mut errors = FieldErrors::new();
        for (row, input) in &rows {
            if let Err(e) = input.validate() {
                let fields = FieldErrors::from(e);
                for field in fields.fields() {
                    for message in fields.get(field).into_iter().flatten() {
                        errors.add(format!("row {}", row), format!("{}: {}", field, message));
                    }
                }
            }
        }
        errors.into_result()?;

        let txn = self.db_pool.begin().await?;
        let mut saved = Vec::with_capacity(rows.len());
        for (_, input) in rows {
            saved.push(insert_item(&txn, input, self.default_min_quantity, Some(actor.id)).await?);
        }
        txn.commit().await?;

        counter!("inventory.items.created", saved.len() as u64);
        info!(count = saved.len(), "items imported");
        self.reindex(&saved).await;
        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn list_used(
        &self,
        work_order: Option<i32>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<used_item::Model>, u64), ServiceError> {
        let mut query = used_item::Entity::find();
        if let Some(wo) = work_order {
            query = query.filter(used_item::Column::WorkOrder.eq(wo));
        }
        let paginator = query
            .order_by_desc(used_item::Column::DatetimeUsed)
            .order_by_desc(used_item::Column::Id)
            .paginate(&*self.db_pool, per_page);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((rows, total))
    }

    /// Free-text search over usage records, ordered by work order then item.
    ///
    /// Every word must match. A word matches a record through the item index, and a numeric word
    /// also matches the record's work order number.
    #[instrument(skip(self))]
    pub async fn search_used(
        &self,
        query: &str,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<used_item::Model>, u64), ServiceError> {
        let words: Vec<&str> = query.split_whitespace().collect();
        if words.is_empty() {
            return Ok((Vec::new(), 0));
        }

        let mut condition = Condition::all();
        for word in words {
            let item_ids: Vec<i32> = self
                .search
                .search(word, self.max_search_results)?
                .into_iter()
                .map(|hit| hit.item_id)
                .collect();
            let mut matches = Condition::any();
            if !item_ids.is_empty() {
                matches = matches.add(used_item::Column::ItemId.is_in(item_ids));
            }
            if let Ok(work_order) = word.parse::<i32>() {
                matches = matches.add(used_item::Column::WorkOrder.eq(work_order));
            }
            if matches.is_empty() {
                return Ok((Vec::new(), 0));
            }
            condition = condition.add(matches);
        }

        let paginator = used_item::Entity::find()
            .filter(condition)
            .order_by_asc(used_item::Column::WorkOrder)
            .order_by_asc(used_item::Column::ItemId)
            .order_by_asc(used_item::Column::Id)
            .paginate(&*self.db_pool, per_page);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.saturating_sub(1)).await?;
        debug!(total, "used items searched");
        Ok((rows, total))
    }

    pub async fn get_used(&self, id: i32) -> Result<used_item::Model, ServiceError> {
        used_item::Entity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Used item {}", id)))
    }

    /// Takes one unit out of stock for a work order.
    #[instrument(skip(self), fields(actor = %actor.username))]
    pub async fn use_item(
        &self,
        actor: &AuthUser,
        input: UseItemInput,
    ) -> Result<used_item::Model, ServiceError> {
        input.validate()?;

        let txn = self.db_pool.begin().await?;
        let current = ItemEntity::find_by_id(input.item_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Item {}", input.item_id)))?;
        if current.quantity <= 0 {
            return Err(ServiceError::BadRequest(
                "Cannot use item with quantity 0.".to_string(),
            ));
        }

        // Conditional decrement; losing a race to the last unit reads as out of stock.
        let result = ItemEntity::update_many()
            .col_expr(
                item::Column::Quantity,
                Expr::col(item::Column::Quantity).sub(1),
            )
            .col_expr(item::Column::LastModifiedBy, Expr::value(Some(actor.id)))
            .col_expr(item::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(item::Column::Id.eq(current.id))
            .filter(item::Column::Quantity.gt(0))
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            warn!(item_id = current.id, "item ran out before it could be used");
            return Err(ServiceError::BadRequest(
                "Cannot use item with quantity 0.".to_string(),
            ));
        }

        let updated = ItemEntity::find_by_id(current.id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Item {}", current.id)))?;

        let used = used_item::ActiveModel {
            item_id: Set(updated.id),
            work_order: Set(input.work_order),
            datetime_used: Set(Utc::now()),
            used_by: Set(Some(actor.id)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        record_history(
            &txn,
            updated.id,
            HistoryAction::Use,
            Some(actor.id),
            format!("Item used in work order {}", input.work_order),
        )
        .await?;
        notify_if_low_stock(&txn, &updated).await?;
        txn.commit().await?;

        Ok(used)
    }

    #[instrument(skip(self))]
    pub async fn delete_used(&self, id: i32) -> Result<(), ServiceError> {
        let found = self.get_used(id).await?;
        used_item::Entity::delete_by_id(found.id)
            .exec(&*self.db_pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn current() -> item::Model {
        item::Model {
            id: 1,
            manufacturer: "Fluke".into(),
            model: "87V".into(),
            part_or_unit: PartOrUnit::Part,
            part_number: "FL-87".into(),
            description: "Meter".into(),
            location: "Shelf A".into(),
            quantity: 4,
            min_quantity: 2,
            unit_price: dec!(199.99),
            last_modified_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn describe_changes_lists_only_changed_fields_in_order() {
        let input = ItemInput {
            location: Some("Shelf B".into()),
            quantity: Some(4),
            manufacturer: Some("Fluke Corp".into()),
            ..Default::default()
        };
        assert_eq!(
            describe_changes(&current(), &input).join(", "),
            "manufacturer: 'Fluke' has been changed to 'Fluke Corp', location: 'Shelf A' has been changed to 'Shelf B'"
        );
    }

    #[test]
    fn describe_changes_treats_equal_prices_as_unchanged() {
        let input = ItemInput {
            unit_price: Some(dec!(199.990)),
            ..Default::default()
        };
        assert!(describe_changes(&current(), &input).is_empty());
    }

    #[test]
    fn present_fields_follow_payload() {
        let input: ItemInput =
            serde_json::from_str(r#"{"quantity": 3, "min_quantity": 1}"#).unwrap();
        assert_eq!(input.present_fields(), vec!["quantity", "min_quantity"]);
    }

    #[test]
    fn validation_rejects_negative_and_overlong_values() {
        let input = ItemInput {
            manufacturer: Some("x".repeat(51)),
            quantity: Some(-1),
            unit_price: Some(dec!(-0.01)),
            ..Default::default()
        };
        let fields = FieldErrors::from(input.validate().unwrap_err());
        assert!(fields.get("manufacturer").is_some());
        assert!(fields.get("quantity").is_some());
        assert!(fields.get("unit_price").is_some());
    }

    #[test]
    fn new_items_take_defaults() {
        let active = ItemInput::default().into_new_active_model(3, Some(9));
        assert_eq!(active.manufacturer.clone().unwrap(), "N/A");
        assert_eq!(active.location.clone().unwrap(), "N/A");
        assert_eq!(active.min_quantity.clone().unwrap(), 3);
        assert_eq!(active.unit_price.clone().unwrap(), dec!(0.01));
        assert_eq!(active.last_modified_by.clone().unwrap(), Some(9));
    }
}
