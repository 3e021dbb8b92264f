pub mod auth;
pub mod common;
pub mod health;
pub mod item_requests;
pub mod items;
pub mod notifications;
pub mod purchase_orders;
pub mod used_items;
pub mod users;

use crate::{
    config::AppConfig,
    db::DbPool,
    services::{
        item_requests::ItemRequestService, items::ItemService,
        notifications::NotificationService, purchase_orders::PurchaseOrderService,
        search::SearchIndex, users::UserService,
    },
};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub items: Arc<ItemService>,
    pub item_requests: Arc<ItemRequestService>,
    pub users: Arc<UserService>,
    pub notifications: Arc<NotificationService>,
    pub purchase_orders: Arc<PurchaseOrderService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, search: Arc<SearchIndex>, config: &AppConfig) -> Self {
        Self {
            items: Arc::new(ItemService::new(
                db_pool.clone(),
                search,
                config.inventory.default_min_quantity,
                config.search.max_results,
            )),
            item_requests: Arc::new(ItemRequestService::new(db_pool.clone())),
            users: Arc::new(UserService::new(db_pool.clone())),
            notifications: Arc::new(NotificationService::new(db_pool.clone())),
            purchase_orders: Arc::new(PurchaseOrderService::new(db_pool)),
        }
    }
}
