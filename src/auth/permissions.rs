/*!
 * # Item field permissions
 *
 * Maps the fields present in an item payload to the operation tags they
 * require, then checks those tags against the role table.
 */

use super::rbac::{role_allows, Operation};
use crate::entities::user::Role;
use crate::errors::ServiceError;

pub const QUANTITY_FIELD: &str = "quantity";
pub const MIN_QUANTITY_FIELD: &str = "min_quantity";

/// Operation a single item field needs.
pub fn operation_for_field(field: &str) -> Operation {
    match field {
        QUANTITY_FIELD => Operation::ItemsUpdateQuantity,
        MIN_QUANTITY_FIELD => Operation::ItemsUpdateMinQuantity,
        _ => Operation::ItemsUpdate,
    }
}

/// Operations that let a role edit at least some item field.
pub const ITEM_EDIT_OPERATIONS: [Operation; 3] = [
    Operation::ItemsUpdate,
    Operation::ItemsUpdateQuantity,
    Operation::ItemsUpdateMinQuantity,
];

pub fn can_edit_items(role: Role) -> bool {
    ITEM_EDIT_OPERATIONS
        .iter()
        .any(|op| role_allows(role, *op))
}

/// Rejects the whole payload when any required operation is missing, naming the fields at fault.
/// A role with no edit rights at all is rejected even for an empty payload.
pub fn check_item_fields(role: Role, fields: &[&str], is_create: bool) -> Result<(), ServiceError> {
    if is_create && !role_allows(role, Operation::ItemsCreate) {
        return Err(ServiceError::Forbidden(format!(
            "Role {} may not create items",
            role
        )));
    }
    if !is_create && !can_edit_items(role) {
        return Err(ServiceError::Forbidden(format!(
            "Role {} may not edit items",
            role
        )));
    }

    let denied: Vec<&str> = fields
        .iter()
        .copied()
        .filter(|field| !role_allows(role, operation_for_field(field)))
        .collect();

    if denied.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::Forbidden(format!(
            "Role {} may not change: {}",
            role,
            denied.join(", ")
        )))
    }
}
