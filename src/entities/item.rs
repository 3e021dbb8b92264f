use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{entity::prelude::*, ActiveValue::Set};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub manufacturer: String,
    pub model: String,
    pub part_or_unit: PartOrUnit,
    pub part_number: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub location: String,
    pub quantity: i32,
    pub min_quantity: i32,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub unit_price: Decimal,
    pub last_modified_by: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    /// Derived on every read; never stored.
    pub fn low_stock(&self) -> bool {
        self.quantity < self.min_quantity
    }

    /// "manufacturer, model" with the part number appended for parts.
    pub fn display_name(&self) -> String {
        match self.part_or_unit {
            PartOrUnit::Part if !self.part_number.is_empty() => {
                format!("{}, {} {}", self.manufacturer, self.model, self.part_number)
            }
            _ => format!("{}, {}", self.manufacturer, self.model),
        }
    }

    pub fn model_part_num(&self) -> String {
        format!("{} {}", self.model, self.part_number)
            .trim()
            .to_string()
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum PartOrUnit {
    #[default]
    #[sea_orm(string_value = "Part")]
    Part,
    #[sea_orm(string_value = "Unit")]
    Unit,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::LastModifiedBy",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    LastModifiedBy,
    #[sea_orm(has_many = "super::item_history::Entity")]
    History,
    #[sea_orm(has_many = "super::used_item::Entity")]
    UsedItems,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LastModifiedBy.def()
    }
}

impl Related<super::item_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::History.def()
    }
}

impl Related<super::used_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UsedItems.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;
        let now = Utc::now();

        if insert {
            active_model.created_at = Set(now);
        }
        active_model.updated_at = Set(now);

        Ok(active_model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn item(quantity: i32, min_quantity: i32) -> Model {
        Model {
            id: 1,
            manufacturer: "Fluke".into(),
            model: "87V".into(),
            part_or_unit: PartOrUnit::Part,
            part_number: "FL-87".into(),
            description: String::new(),
            location: "Shelf A".into(),
            quantity,
            min_quantity,
            unit_price: dec!(0.01),
            last_modified_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn display_name_includes_part_number_for_parts_only() {
        let mut part = item(1, 0);
        assert_eq!(part.display_name(), "Fluke, 87V FL-87");
        part.part_or_unit = PartOrUnit::Unit;
        assert_eq!(part.display_name(), "Fluke, 87V");
    }

    #[test]
    fn model_part_num_trims_blank_part_number() {
        let mut part = item(1, 0);
        assert_eq!(part.model_part_num(), "87V FL-87");
        part.part_number.clear();
        assert_eq!(part.model_part_num(), "87V");
    }

    #[test]
    fn at_threshold_is_not_low() {
        assert!(!item(5, 5).low_stock());
        assert!(item(4, 5).low_stock());
    }

    proptest! {
        #[test]
        fn low_stock_iff_quantity_below_threshold(quantity in 0i32..10_000, threshold in 0i32..10_000) {
            prop_assert_eq!(item(quantity, threshold).low_stock(), quantity < threshold);
        }
    }
}
