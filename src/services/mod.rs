pub mod import;
pub mod item_requests;
pub mod items;
pub mod notifications;
pub mod purchase_orders;
pub mod search;
pub mod users;
