use crate::{
    auth::{hash_password, AuthUser},
    db::DbPool,
    entities::{
        item, item_history, item_request, notification, used_item,
        user::{self, Entity as UserEntity, Role},
    },
    errors::ServiceError,
};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

static USERNAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\w.@+-]{1,150}$").unwrap());

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(regex(
        path = "USERNAME_RE",
        message = "must be 1-150 characters: letters, digits and @.+-_"
    ))]
    pub username: String,
    #[validate(length(max = 150))]
    #[serde(default)]
    pub first_name: String,
    #[validate(length(max = 150))]
    #[serde(default)]
    pub last_name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(length(max = 150))]
    pub first_name: Option<String>,
    #[validate(length(max = 150))]
    pub last_name: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: Option<String>,
    pub role: Option<Role>,
}

/// A user without the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for UserResponse {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            first_name: m.first_name,
            last_name: m.last_name,
            email: m.email,
            role: m.role,
            created_at: m.created_at,
        }
    }
}

#[derive(Clone)]
pub struct UserService {
    db_pool: Arc<DbPool>,
}

impl UserService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, page: u64, per_page: u64) -> Result<(Vec<user::Model>, u64), ServiceError> {
        let paginator = UserEntity::find()
            .order_by_asc(user::Column::Username)
            .paginate(&*self.db_pool, per_page);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((rows, total))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<user::Model, ServiceError> {
        UserEntity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User {}", id)))
    }

    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn create(&self, input: CreateUser) -> Result<user::Model, ServiceError> {
        input.validate()?;

        let db = &*self.db_pool;
        let taken = UserEntity::find()
            .filter(user::Column::Username.eq(input.username.as_str()))
            .count(db)
            .await?;
        if taken > 0 {
            return Err(ServiceError::Conflict(format!(
                "Username {} is already taken",
                input.username
            )));
        }

        let saved = user::ActiveModel {
            username: Set(input.username),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            email: Set(input.email),
            password_hash: Set(hash_password(&input.password)?),
            role: Set(input.role),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        info!(user_id = saved.id, role = %saved.role, "user created");
        Ok(saved)
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i32, input: UpdateUser) -> Result<user::Model, ServiceError> {
        input.validate()?;

        let found = self.get(id).await?;
        let mut active: user::ActiveModel = found.into();
        if let Some(v) = input.first_name {
            active.first_name = Set(v);
        }
        if let Some(v) = input.last_name {
            active.last_name = Set(v);
        }
        if let Some(v) = input.email {
            active.email = Set(v);
        }
        if let Some(role) = input.role {
            active.role = Set(role);
        }
        if let Some(password) = input.password {
            active.password_hash = Set(hash_password(&password)?);
        }
        Ok(active.update(&*self.db_pool).await?)
    }

    /// Items the user touched stay; their `last_modified_by` is cleared.
    #[instrument(skip(self), fields(actor = %actor.username))]
    pub async fn delete(&self, actor: &AuthUser, id: i32) -> Result<(), ServiceError> {
        if actor.id == id {
            return Err(ServiceError::BadRequest(
                "You cannot delete your own account".to_string(),
            ));
        }
        let found = self.get(id).await?;

        let txn = self.db_pool.begin().await?;
        item::Entity::update_many()
            .col_expr(item::Column::LastModifiedBy, Expr::value(Option::<i32>::None))
            .filter(item::Column::LastModifiedBy.eq(found.id))
            .exec(&txn)
            .await?;
        item_history::Entity::update_many()
            .col_expr(item_history::Column::UserId, Expr::value(Option::<i32>::None))
            .filter(item_history::Column::UserId.eq(found.id))
            .exec(&txn)
            .await?;
        used_item::Entity::update_many()
            .col_expr(used_item::Column::UsedBy, Expr::value(Option::<i32>::None))
            .filter(used_item::Column::UsedBy.eq(found.id))
            .exec(&txn)
            .await?;
        item_request::Entity::update_many()
            .col_expr(item_request::Column::StatusChangedBy, Expr::value(Option::<i32>::None))
            .filter(item_request::Column::StatusChangedBy.eq(found.id))
            .exec(&txn)
            .await?;
        notification::Entity::delete_many()
            .filter(notification::Column::UserId.eq(found.id))
            .exec(&txn)
            .await?;
        item_request::Entity::delete_many()
            .filter(item_request::Column::RequestedBy.eq(found.id))
            .exec(&txn)
            .await?;
        UserEntity::delete_by_id(found.id).exec(&txn).await?;
        txn.commit().await?;

        info!(user_id = id, "user deleted");
        Ok(())
    }
}
