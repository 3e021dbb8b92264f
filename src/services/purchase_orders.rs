//! Purchase orders are never stored: a submitted set of lines is validated as a whole and
//! rendered straight to an `.xlsx` workbook.

use crate::{
    db::DbPool,
    entities::item::{self, Entity as ItemEntity},
    errors::{FieldErrors, ServiceError},
};
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, XlsxError};
use sea_orm::EntityTrait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

pub const EXPORT_FILE_NAME: &str = "new_purchase_order.xlsx";
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const SHEET_NAME: &str = "Purchase Order";

/// Zero-based row of the column headers (row 15 in the sheet).
pub const HEADER_ROW: u32 = 14;
/// Zero-based row of the first line item (row 16 in the sheet).
pub const FIRST_LINE_ROW: u32 = 15;

const ACCOUNTING_FORMAT: &str = r#"_($* #,##0.00_);_($* (#,##0.00);_($* "-"??_);_(@_)"#;

fn validate_line_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        let mut err = ValidationError::new("unit_price");
        err.message = Some("must be zero or greater".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, Validate, ToSchema)]
pub struct PurchaseOrderLine {
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    #[serde(default)]
    pub manufacturer: String,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    #[serde(default)]
    pub model_part_num: String,
    #[validate(range(min = 0, message = "must be zero or greater"))]
    #[serde(default)]
    pub quantity_ordered: i32,
    #[validate(custom = "validate_line_price")]
    #[schema(value_type = String, example = "12.50")]
    #[serde(default)]
    pub unit_price: Decimal,
    #[serde(default)]
    pub description: String,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    #[serde(default)]
    pub serial_num: String,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    #[serde(default)]
    pub property_num: String,
}

impl PurchaseOrderLine {
    /// One line ordering enough to bring the item back up to its threshold.
    pub fn from_item(item: &item::Model) -> Self {
        Self {
            manufacturer: item.manufacturer.clone(),
            model_part_num: item.model_part_num(),
            quantity_ordered: (item.min_quantity - item.quantity).max(0),
            unit_price: item.unit_price,
            description: item.description.clone(),
            serial_num: String::new(),
            property_num: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct PurchaseOrderRequest {
    #[serde(default)]
    pub lines: Vec<PurchaseOrderLine>,
}

/// Validates every line; errors from all lines come back together keyed `lines[i].field`.
pub fn validate_lines(lines: &[PurchaseOrderLine]) -> Result<(), ServiceError> {
    let mut errors = FieldErrors::new();
    for (i, line) in lines.iter().enumerate() {
        if let Err(e) = line.validate() {
            errors.merge_prefixed(&format!("lines[{}]", i), e.into());
        }
    }
    errors.into_result()
}

fn xlsx_error(e: XlsxError) -> ServiceError {
    ServiceError::SpreadsheetError(e.to_string())
}

/// Renders the workbook. Lines must already be validated.
pub fn render_workbook(lines: &[PurchaseOrderLine], date: NaiveDate) -> Result<Vec<u8>, ServiceError> {
    let mut workbook = Workbook::new();
    let title = Format::new().set_bold().set_font_size(18);
    let bold = Format::new().set_bold();
    let header = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_border_bottom(FormatBorder::Thin);
    let accounting = Format::new().set_num_format(ACCOUNTING_FORMAT);
    let total_money = Format::new()
        .set_bold()
        .set_num_format(ACCOUNTING_FORMAT)
        .set_border_top(FormatBorder::Double);

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME).map_err(xlsx_error)?;

    sheet
        .write_string_with_format(1, 1, SHEET_NAME, &title)
        .map_err(xlsx_error)?;
    sheet
        .write_string_with_format(3, 1, "Date:", &bold)
        .map_err(xlsx_error)?;
    sheet
        .write_string(3, 2, date.format("%m/%d/%Y").to_string())
        .map_err(xlsx_error)?;

    let headers = [
        (1u16, "Manufacturer", 20.0),
        (2, "Model/Part #", 24.0),
        (3, "Qty", 8.0),
        (4, "Description", 36.0),
        (6, "Serial #", 16.0),
        (7, "Property #", 16.0),
        (8, "Unit Price", 14.0),
        (9, "Amount", 14.0),
    ];
    for (col, label, width) in headers {
        sheet
            .write_string_with_format(HEADER_ROW, col, label, &header)
            .map_err(xlsx_error)?;
        sheet.set_column_width(col, width).map_err(xlsx_error)?;
    }

    for (i, line) in lines.iter().enumerate() {
        let row = FIRST_LINE_ROW + i as u32;
        // Formulas reference 1-based sheet rows.
        let sheet_row = row + 1;
        sheet
            .write_string(row, 1, &line.manufacturer)
            .map_err(xlsx_error)?;
        sheet
            .write_string(row, 2, &line.model_part_num)
            .map_err(xlsx_error)?;
        sheet
            .write_number(row, 3, f64::from(line.quantity_ordered))
            .map_err(xlsx_error)?;
        sheet
            .write_string(row, 4, &line.description)
            .map_err(xlsx_error)?;
        sheet
            .write_string(row, 6, &line.serial_num)
            .map_err(xlsx_error)?;
        sheet
            .write_string(row, 7, &line.property_num)
            .map_err(xlsx_error)?;
        sheet
            .write_number_with_format(row, 8, line.unit_price.to_f64().unwrap_or(0.0), &accounting)
            .map_err(xlsx_error)?;
        sheet
            .write_formula_with_format(
                row,
                9,
                format!("=I{}*D{}", sheet_row, sheet_row).as_str(),
                &accounting,
            )
            .map_err(xlsx_error)?;
    }

    if !lines.is_empty() {
        let total_row = FIRST_LINE_ROW + lines.len() as u32;
        let last_sheet_row = total_row;
        sheet
            .write_string_with_format(total_row, 8, "Total", &bold)
            .map_err(xlsx_error)?;
        sheet
            .write_formula_with_format(
                total_row,
                9,
                format!("=SUM(J{}:J{})", FIRST_LINE_ROW + 1, last_sheet_row).as_str(),
                &total_money,
            )
            .map_err(xlsx_error)?;
    }

    workbook.save_to_buffer().map_err(xlsx_error)
}

#[derive(Clone)]
pub struct PurchaseOrderService {
    db_pool: Arc<DbPool>,
}

impl PurchaseOrderService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn prefill(&self, item_id: i32) -> Result<PurchaseOrderLine, ServiceError> {
        let found = ItemEntity::find_by_id(item_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Item {}", item_id)))?;
        Ok(PurchaseOrderLine::from_item(&found))
    }

    #[instrument(skip(self, request), fields(lines = request.lines.len()))]
    pub fn export(&self, request: &PurchaseOrderRequest) -> Result<Vec<u8>, ServiceError> {
        validate_lines(&request.lines)?;
        let bytes = render_workbook(&request.lines, chrono::Local::now().date_naive())?;
        info!(lines = request.lines.len(), bytes = bytes.len(), "purchase order exported");
        Ok(bytes)
    }
}
