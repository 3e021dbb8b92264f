use crate::{
    db::DbPool,
    entities::{
        item,
        notification::{self, Entity as NotificationEntity},
        user::{self, Role},
    },
    errors::ServiceError,
};
use chrono::Utc;
use metrics::counter;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{debug, instrument};

pub const LOW_STOCK_SUBJECT: &str = "Low Stock Alert";
pub const NEW_REQUEST_SUBJECT: &str = "New Item Request";

pub fn low_stock_message(item: &item::Model) -> String {
    format!(
        "{} is low in stock. {} left.",
        item.display_name(),
        item.quantity
    )
}

pub fn new_request_message(manufacturer: &str, model_part_num: &str) -> String {
    format!(
        "There's a new item request for {}, {}.",
        manufacturer, model_part_num
    )
}

pub fn status_change_message(
    manufacturer: &str,
    model_part_num: &str,
    status: &str,
    reviewer: &str,
) -> String {
    format!(
        "Your item request for {}, {} has been {} by {}. If you're all set with your item request, please delete it.",
        manufacturer,
        model_part_num,
        status.to_lowercase(),
        reviewer
    )
}

/// Writes one unread notification for `user_id`. Runs on whatever connection or
/// transaction the triggering write uses.
pub async fn notify_user<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    subject: &str,
    message: &str,
) -> Result<notification::Model, ServiceError> {
    let saved = notification::ActiveModel {
        subject: Set(subject.to_string()),
        message: Set(message.to_string()),
        is_read: Set(false),
        timestamp: Set(Utc::now()),
        user_id: Set(user_id),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    counter!("inventory.notifications.created", 1);
    Ok(saved)
}

/// One notification per Superuser; returns how many were written.
pub async fn notify_superusers<C: ConnectionTrait>(
    conn: &C,
    subject: &str,
    message: &str,
) -> Result<usize, ServiceError> {
    let superusers = user::Entity::find()
        .filter(user::Column::Role.eq(Role::Superuser))
        .all(conn)
        .await?;

    for su in &superusers {
        notify_user(conn, su.id, subject, message).await?;
    }
    debug!(subject, recipients = superusers.len(), "notified superusers");
    Ok(superusers.len())
}

/// Alerts every Superuser when `item` sits below its threshold.
pub async fn notify_if_low_stock<C: ConnectionTrait>(
    conn: &C,
    item: &item::Model,
) -> Result<(), ServiceError> {
    if item.low_stock() {
        notify_superusers(conn, LOW_STOCK_SUBJECT, &low_stock_message(item)).await?;
    }
    Ok(())
}

/// Read-side and owner actions on a user's own notifications.
#[derive(Clone)]
pub struct NotificationService {
    db_pool: Arc<DbPool>,
}

impl NotificationService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Newest first.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        user_id: i32,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<notification::Model>, u64), ServiceError> {
        let db = &*self.db_pool;
        let paginator = NotificationEntity::find()
            .filter(notification::Column::UserId.eq(user_id))
            .order_by_desc(notification::Column::Timestamp)
            .order_by_desc(notification::Column::Id)
            .paginate(db, per_page);

        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((rows, total))
    }

    #[instrument(skip(self))]
    pub async fn unread_count(&self, user_id: i32) -> Result<u64, ServiceError> {
        let db = &*self.db_pool;
        let count = NotificationEntity::find()
            .filter(notification::Column::UserId.eq(user_id))
            .filter(notification::Column::IsRead.eq(false))
            .count(db)
            .await?;
        Ok(count)
    }

    /// Someone else's notification reads as missing.
    async fn find_owned(
        &self,
        user_id: i32,
        id: i32,
    ) -> Result<notification::Model, ServiceError> {
        let db = &*self.db_pool;
        NotificationEntity::find_by_id(id)
            .filter(notification::Column::UserId.eq(user_id))
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Notification {}", id)))
    }

    #[instrument(skip(self))]
    pub async fn mark_read(
        &self,
        user_id: i32,
        id: i32,
    ) -> Result<notification::Model, ServiceError> {
        let found = self.find_owned(user_id, id).await?;
        if found.is_read {
            return Ok(found);
        }
        let mut active: notification::ActiveModel = found.into();
        active.is_read = Set(true);
        Ok(active.update(&*self.db_pool).await?)
    }

    /// Returns the number of notifications that flipped to read.
    #[instrument(skip(self))]
    pub async fn mark_all_read(&self, user_id: i32) -> Result<u64, ServiceError> {
        let result = NotificationEntity::update_many()
            .col_expr(notification::Column::IsRead, Expr::value(true))
            .filter(notification::Column::UserId.eq(user_id))
            .filter(notification::Column::IsRead.eq(false))
            .exec(&*self.db_pool)
            .await?;
        Ok(result.rows_affected)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: i32, id: i32) -> Result<(), ServiceError> {
        let found = self.find_owned(user_id, id).await?;
        NotificationEntity::delete_by_id(found.id)
            .exec(&*self.db_pool)
            .await?;
        Ok(())
    }
}
