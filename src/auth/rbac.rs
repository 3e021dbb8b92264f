/*!
 * # Role-Based Access Control (RBAC) Module
 *
 * Each role maps to an explicit set of operation tags. The sets are not
 * nested: an Intern may adjust quantities without holding the wider item
 * edit rights a Technician has, and a Technician may edit items without
 * being able to move reorder thresholds.
 */

use crate::entities::user::Role;
use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Every gated action in the API, tagged `resource:action`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, EnumIter,
)]
pub enum Operation {
    #[strum(serialize = "items:read")]
    #[serde(rename = "items:read")]
    ItemsRead,
    #[strum(serialize = "items:create")]
    #[serde(rename = "items:create")]
    ItemsCreate,
    /// Any item field other than quantity and min_quantity
    #[strum(serialize = "items:update")]
    #[serde(rename = "items:update")]
    ItemsUpdate,
    #[strum(serialize = "items:update_quantity")]
    #[serde(rename = "items:update_quantity")]
    ItemsUpdateQuantity,
    #[strum(serialize = "items:update_min_quantity")]
    #[serde(rename = "items:update_min_quantity")]
    ItemsUpdateMinQuantity,
    #[strum(serialize = "items:delete")]
    #[serde(rename = "items:delete")]
    ItemsDelete,
    #[strum(serialize = "items:import")]
    #[serde(rename = "items:import")]
    ItemsImport,
    #[strum(serialize = "items:history")]
    #[serde(rename = "items:history")]
    ItemsHistory,
    #[strum(serialize = "used_items:read")]
    #[serde(rename = "used_items:read")]
    UsedItemsRead,
    #[strum(serialize = "used_items:create")]
    #[serde(rename = "used_items:create")]
    UsedItemsCreate,
    #[strum(serialize = "used_items:delete")]
    #[serde(rename = "used_items:delete")]
    UsedItemsDelete,
    #[strum(serialize = "requests:read")]
    #[serde(rename = "requests:read")]
    RequestsRead,
    #[strum(serialize = "requests:create")]
    #[serde(rename = "requests:create")]
    RequestsCreate,
    /// Accept or reject
    #[strum(serialize = "requests:review")]
    #[serde(rename = "requests:review")]
    RequestsReview,
    #[strum(serialize = "requests:delete")]
    #[serde(rename = "requests:delete")]
    RequestsDelete,
    #[strum(serialize = "users:manage")]
    #[serde(rename = "users:manage")]
    UsersManage,
    #[strum(serialize = "purchase_orders:export")]
    #[serde(rename = "purchase_orders:export")]
    PurchaseOrdersExport,
    #[strum(serialize = "notifications:read")]
    #[serde(rename = "notifications:read")]
    NotificationsRead,
    /// Mark read or delete
    #[strum(serialize = "notifications:manage")]
    #[serde(rename = "notifications:manage")]
    NotificationsManage,
}

lazy_static! {
    /// The role table. Everything that gates an action reads this map.
    pub static ref ROLE_PERMISSIONS: HashMap<Role, HashSet<Operation>> = {
        use Operation::*;

        let mut table = HashMap::new();

        table.insert(Role::Superuser, Operation::iter().collect());

        table.insert(
            Role::Technician,
            [
                ItemsRead,
                ItemsCreate,
                ItemsUpdate,
                ItemsUpdateQuantity,
                ItemsDelete,
                ItemsImport,
                ItemsHistory,
                UsedItemsRead,
                UsedItemsCreate,
                UsedItemsDelete,
                RequestsRead,
                RequestsCreate,
                RequestsDelete,
                NotificationsRead,
                NotificationsManage,
            ]
            .into_iter()
            .collect(),
        );

        table.insert(
            Role::Intern,
            [
                ItemsRead,
                ItemsUpdateQuantity,
                ItemsHistory,
                UsedItemsRead,
                NotificationsRead,
                NotificationsManage,
            ]
            .into_iter()
            .collect(),
        );

        table.insert(
            Role::Viewer,
            [ItemsRead, ItemsHistory, UsedItemsRead, NotificationsRead]
                .into_iter()
                .collect(),
        );

        table
    };
}

/// Table lookup; a role missing from the table is denied everything.
pub fn role_allows(role: Role, operation: Operation) -> bool {
    ROLE_PERMISSIONS
        .get(&role)
        .map(|ops| ops.contains(&operation))
        .unwrap_or(false)
}

/// Read-only view over the role table, handed to handlers that report permissions.
#[derive(Clone, Default)]
pub struct RbacService;

impl RbacService {
    pub fn new() -> Self {
        Self
    }

    /// Tags granted to a role, sorted for stable output.
    pub fn permissions_for(&self, role: Role) -> Vec<String> {
        let mut tags: Vec<String> = ROLE_PERMISSIONS
            .get(&role)
            .map(|ops| ops.iter().map(|op| op.to_string()).collect())
            .unwrap_or_default();
        tags.sort();
        tags
    }
}
