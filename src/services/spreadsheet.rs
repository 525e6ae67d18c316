use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::domain::{Cell, ResultTable};

pub const SHEET_NAME: &str = "About Us Results";
pub const EXPORT_FILE_NAME: &str = "AboutUsResults.xlsx";
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Longest string Excel keeps in one cell, counted in characters.
pub const MAX_CELL_CHARS: usize = 32_767;

#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("xlsx error: {0}")]
    Xlsx(#[from] XlsxError),
    #[error("table is too large for a worksheet")]
    TooLarge,
}

/// Writes the table to a single-sheet workbook: header row, then one row
/// per record. No index column. Text longer than a cell can hold is cut to
/// `MAX_CELL_CHARS`.
pub fn export_xlsx(table: &ResultTable) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, header) in table.headers.iter().enumerate() {
        let col = u16::try_from(col).map_err(|_| ExportError::TooLarge)?;
        worksheet.write_string_with_format(0, col, fit_cell(header), &header_format)?;
    }

    for (row_index, row) in table.rows.iter().enumerate() {
        let row_number = u32::try_from(row_index + 1).map_err(|_| ExportError::TooLarge)?;

        for (col, cell) in row.iter().enumerate() {
            let col = u16::try_from(col).map_err(|_| ExportError::TooLarge)?;
            match cell {
                Cell::Empty => {}
                Cell::Text(s) => {
                    if s.chars().count() > MAX_CELL_CHARS {
                        log::warn!(
                            "Truncating cell at row {} column {} to {} characters",
                            row_number,
                            col,
                            MAX_CELL_CHARS
                        );
                    }
                    worksheet.write_string(row_number, col, fit_cell(s))?;
                }
                Cell::Number(n) => match n.as_f64() {
                    Some(f) => {
                        worksheet.write_number(row_number, col, f)?;
                    }
                    None => {
                        worksheet.write_string(row_number, col, n.to_string())?;
                    }
                },
                Cell::Bool(b) => {
                    worksheet.write_boolean(row_number, col, *b)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn fit_cell(text: &str) -> String {
    text.chars().take(MAX_CELL_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use calamine::{open_workbook_from_rs, Data, Range, Reader, Xlsx};
    use serde_json::json;

    use super::*;
    use crate::domain::ResultRecord;

    fn read_back(bytes: Vec<u8>) -> (Vec<String>, Range<Data>) {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        let names = workbook.sheet_names();
        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        (names, range)
    }

    fn text(s: &str) -> Data {
        Data::String(s.to_string())
    }

    #[test]
    fn every_record_becomes_one_unchanged_row() {
        let records: Vec<ResultRecord> = serde_json::from_value(json!([
            {
                "url": "https://a.com",
                "title": "A",
                "date": "2024",
                "content": "About A",
                "rank": 1,
                "overseas_investment_related": true,
                "supporting_evidence": "Office in Tokyo",
            },
            {"url": "https://b.com", "title": "B", "date": null, "content": "About B", "public": true},
            {"url": "https://b.com", "title": "B", "date": null, "content": "About B", "public": true},
        ]))
        .unwrap();
        let table = ResultTable::from_records(&records);

        let (names, range) = read_back(export_xlsx(&table).unwrap());

        assert_eq!(names, vec!["About Us Results"]);
        let rows: Vec<&[Data]> = range.rows().collect();
        assert_eq!(rows.len(), records.len() + 1);
        assert_eq!(
            rows[0],
            &[
                text("URL"),
                text("Title"),
                text("Date"),
                text("About Us Content"),
                text("rank"),
                text("public"),
            ][..]
        );
        assert_eq!(
            rows[1],
            &[
                text("https://a.com"),
                text("A"),
                text("2024"),
                text("About A"),
                Data::Float(1.0),
                Data::Empty,
            ][..]
        );
        assert_eq!(
            rows[2],
            &[
                text("https://b.com"),
                text("B"),
                Data::Empty,
                text("About B"),
                Data::Empty,
                Data::Bool(true),
            ][..]
        );
        assert_eq!(rows[2], rows[3]);
    }

    #[test]
    fn overlong_text_is_truncated_not_rejected() {
        let long = "x".repeat(MAX_CELL_CHARS + 10);
        let table = ResultTable {
            headers: vec!["About Us Content".to_string()],
            rows: vec![vec![Cell::Text(long)]],
        };

        let (_, range) = read_back(export_xlsx(&table).unwrap());

        match range.get_value((1, 0)) {
            Some(Data::String(s)) => assert_eq!(s.chars().count(), MAX_CELL_CHARS),
            other => panic!("unexpected cell {:?}", other),
        }
    }

    #[test]
    fn exports_header_only_table() {
        let table = ResultTable {
            headers: vec!["URL".to_string()],
            rows: vec![],
        };

        let (names, range) = read_back(export_xlsx(&table).unwrap());

        assert_eq!(names, vec![SHEET_NAME]);
        assert_eq!(range.get_value((0, 0)), Some(&text("URL")));
        assert_eq!(range.height(), 1);
    }
}
