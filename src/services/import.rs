//! Reads item rows out of an uploaded `.xlsx` workbook.
//!
//! The first worksheet is used. Row 1 is a header, data runs until the first blank row, and
//! columns follow the item field order.

use super::items::ItemInput;
use crate::{
    entities::item::PartOrUnit,
    errors::{FieldErrors, ServiceError},
};
use calamine::{open_workbook_from_rs, Data, Range, Reader, Xlsx};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::io::Cursor;
use std::str::FromStr;
use tracing::debug;

pub const COLUMNS: [&str; 9] = [
    "manufacturer",
    "model",
    "part_or_unit",
    "part_number",
    "description",
    "location",
    "quantity",
    "min_quantity",
    "unit_price",
];

/// Parses the workbook into `(sheet row, item)` pairs. Cell-level problems are collected per row.
pub fn parse_items(bytes: &[u8]) -> Result<Vec<(usize, ItemInput)>, ServiceError> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| ServiceError::SpreadsheetError(format!("Not a readable .xlsx file: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ServiceError::SpreadsheetError("Workbook has no worksheets".to_string()))?
        .map_err(|e| ServiceError::SpreadsheetError(e.to_string()))?;

    parse_range(&range)
}

fn parse_range(range: &Range<Data>) -> Result<Vec<(usize, ItemInput)>, ServiceError> {
    let last_row = match range.end() {
        Some((row, _)) => row,
        None => return Ok(Vec::new()),
    };

    let mut rows = Vec::new();
    let mut errors = FieldErrors::new();

    // Zero-based row 0 is the header.
    for row in 1..=last_row {
        let cells: Vec<Option<&Data>> = (0..COLUMNS.len() as u32)
            .map(|col| range.get_value((row, col)).filter(|d| !is_blank(d)))
            .collect();
        if cells.iter().all(Option::is_none) {
            break;
        }

        let sheet_row = row as usize + 1;
        let key = format!("row {}", sheet_row);
        match parse_row(&cells) {
            Ok(input) => rows.push((sheet_row, input)),
            Err(messages) => {
                for message in messages {
                    errors.add(key.clone(), message);
                }
            }
        }
    }

    errors.into_result()?;
    debug!(rows = rows.len(), "parsed import workbook");
    Ok(rows)
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn parse_row(cells: &[Option<&Data>]) -> Result<ItemInput, Vec<String>> {
    let mut problems = Vec::new();
    let mut record = |field: &str, msg: String| problems.push(format!("{}: {}", field, msg));

    let part_or_unit = match cells[2].map(cell_text) {
        Some(text) => match parse_part_or_unit(&text) {
            Some(kind) => Some(kind),
            None => {
                record("part_or_unit", format!("'{}' is not Part or Unit", text));
                None
            }
        },
        None => None,
    };

    let mut int_at = |idx: usize| -> Option<i32> {
        let cell = cells[idx]?;
        match cell_int(cell) {
            Some(v) => Some(v),
            None => {
                record(COLUMNS[idx], "must be a whole number".to_string());
                None
            }
        }
    };
    let quantity = int_at(6);
    let min_quantity = int_at(7);

    let unit_price = match cells[8] {
        Some(cell) => match cell_decimal(cell) {
            Some(v) => Some(v),
            None => {
                record("unit_price", "must be a number".to_string());
                None
            }
        },
        None => None,
    };

    if !problems.is_empty() {
        return Err(problems);
    }

    Ok(ItemInput {
        manufacturer: cells[0].map(cell_text),
        model: cells[1].map(cell_text),
        part_or_unit,
        part_number: cells[3].map(cell_text),
        description: cells[4].map(cell_text),
        location: cells[5].map(cell_text),
        quantity,
        min_quantity,
        unit_price,
    })
}

fn parse_part_or_unit(text: &str) -> Option<PartOrUnit> {
    match text.to_ascii_lowercase().as_str() {
        "part" => Some(PartOrUnit::Part),
        "unit" => Some(PartOrUnit::Unit),
        _ => None,
    }
}

/// Text cells are trimmed; whole floats lose their `.0` so part numbers read naturally.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

fn cell_int(cell: &Data) -> Option<i32> {
    match cell {
        Data::Int(i) => i32::try_from(*i).ok(),
        Data::Float(f) if f.fract() == 0.0 => i32::try_from(*f as i64).ok(),
        Data::String(s) => {
            let s = s.trim();
            s.parse::<i32>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.fract() == 0.0)
                    .and_then(|f| i32::try_from(f as i64).ok())
            })
        }
        _ => None,
    }
}

fn cell_decimal(cell: &Data) -> Option<Decimal> {
    match cell {
        Data::Int(i) => Some(Decimal::from(*i)),
        Data::Float(f) => Decimal::from_f64(*f).map(|d| d.round_dp(2)),
        Data::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use rust_xlsxwriter::Workbook;

    fn workbook(rows: &[&[&str]]) -> Vec<u8> {
        let mut book = Workbook::new();
        let sheet = book.add_worksheet();
        for (c, name) in COLUMNS.iter().enumerate() {
            sheet.write_string(0, c as u16, *name).unwrap();
        }
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                let (r, c) = (r as u32 + 1, c as u16);
                match value.parse::<f64>() {
                    Ok(n) if c >= 6 => {
                        sheet.write_number(r, c, n).unwrap();
                    }
                    _ => {
                        sheet.write_string(r, c, *value).unwrap();
                    }
                }
            }
        }
        book.save_to_buffer().unwrap()
    }

    #[test]
    fn reads_rows_until_first_blank() {
        let bytes = workbook(&[
            &["Fluke", "87V", "Part", "FL-87", "Meter", "Shelf A", "4", "2", "199.99"],
            &["Grundfos", "CR 5", "unit", "", "", "Bay 2", "1", "", ""],
            &["", "", "", "", "", "", "", "", ""],
            &["Ignored", "after", "blank", "", "", "", "", "", ""],
        ]);
        let rows = parse_items(&bytes).unwrap();
        assert_eq!(rows.len(), 2);

        let (row, first) = &rows[0];
        assert_eq!(*row, 2);
        assert_eq!(first.manufacturer.as_deref(), Some("Fluke"));
        assert_eq!(first.quantity, Some(4));
        assert_eq!(first.min_quantity, Some(2));
        assert_eq!(first.unit_price, Some(dec!(199.99)));

        let (row, second) = &rows[1];
        assert_eq!(*row, 3);
        assert_eq!(second.part_or_unit, Some(PartOrUnit::Unit));
        assert_eq!(second.part_number, None);
        assert_eq!(second.min_quantity, None);
        assert_eq!(second.unit_price, None);
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let mut book = Workbook::new();
        let sheet = book.add_worksheet();
        sheet.write_string(1, 0, "Fluke").unwrap();
        sheet.write_string(1, 6, " 7 ").unwrap();
        sheet.write_string(1, 8, "12.50").unwrap();
        let rows = parse_items(&book.save_to_buffer().unwrap()).unwrap();
        assert_eq!(rows[0].1.quantity, Some(7));
        assert_eq!(rows[0].1.unit_price, Some(dec!(12.50)));
    }

    #[test]
    fn bad_cells_are_reported_per_row() {
        let bytes = workbook(&[
            &["Fluke", "87V", "Part", "", "", "", "4", "", ""],
            &["Fluke", "87V", "Widget", "", "", "", "many", "", ""],
        ]);
        match parse_items(&bytes) {
            Err(ServiceError::InvalidFields(fields)) => {
                let messages = fields.get("row 3").unwrap();
                assert!(messages.iter().any(|m| m.starts_with("part_or_unit")));
                assert!(messages.iter().any(|m| m.starts_with("quantity")));
                assert!(fields.get("row 2").is_none());
            }
            other => panic!("expected row errors, got {:?}", other),
        }
    }

    #[test]
    fn garbage_bytes_are_a_spreadsheet_error() {
        assert!(matches!(
            parse_items(b"not a zip"),
            Err(ServiceError::SpreadsheetError(_))
        ));
    }

    #[test]
    fn whole_floats_read_as_integer_text() {
        assert_eq!(cell_text(&Data::Float(1234.0)), "1234");
        assert_eq!(cell_text(&Data::String("  x ".into())), "x");
    }
}
