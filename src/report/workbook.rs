//! Spreadsheet rendition of the resources report: a styled table, a totals row summing the
//! quantity columns and averaging `Percentage`, and columns fitted to their content.

use std::path::Path;

use rust_xlsxwriter::{
    ColNum, Format, Formula, RowNum, Table, TableColumn, Workbook, Worksheet, XlsxError,
};

use super::{ReportError, ResourceRow, RESOURCE_HEADER};

pub const SHEET_NAME: &str = "Resources";
pub const TOTAL_LABEL: &str = "Total";

/// Columns summed in the totals row: Total, Spent, Needed, Owned, Missing.
const SUMMED_COLUMNS: [ColNum; 5] = [4, 5, 6, 7, 8];
const PERCENTAGE_COLUMN: ColNum = 9;

fn column_letter(col: ColNum) -> char {
    char::from(b'A' + col as u8)
}

fn quantity(row: &ResourceRow, col: ColNum) -> i64 {
    match col {
        4 => row.total,
        5 => row.spent,
        6 => row.needed,
        7 => row.owned,
        _ => row.missing,
    }
}

fn fill(worksheet: &mut Worksheet, rows: &[ResourceRow]) -> Result<(), XlsxError> {
    let percent = Format::new().set_num_format("0.00%");
    let bold = Format::new().set_bold();
    let bold_percent = Format::new().set_bold().set_num_format("0.00%");

    worksheet.set_name(SHEET_NAME)?;
    for (index, row) in rows.iter().enumerate() {
        let r = index as RowNum + 1;
        worksheet.write_string(r, 0, row.resource.as_str())?;
        if let Some(tier) = row.tier {
            worksheet.write_number(r, 1, f64::from(tier))?;
        }
        if let Some(lmd) = row.lmd {
            worksheet.write_number(r, 2, lmd as f64)?;
        }
        if let Some(droppable) = row.droppable {
            worksheet.write_boolean(r, 3, droppable)?;
        }
        for col in SUMMED_COLUMNS {
            worksheet.write_number(r, col, quantity(row, col) as f64)?;
        }
        worksheet.write_number_with_format(
            r,
            PERCENTAGE_COLUMN,
            row.percentage / 100.0,
            &percent,
        )?;
    }

    // Excel tables need at least one data row under the header.
    let last_data_row = rows.len().max(1) as RowNum;
    let columns: Vec<TableColumn> = RESOURCE_HEADER
        .iter()
        .map(|name| TableColumn::new().set_header(*name))
        .collect();
    let table = Table::new().set_columns(&columns);
    worksheet.add_table(0, 0, last_data_row, PERCENTAGE_COLUMN, &table)?;

    // Spreadsheet rows are 1-based: data spans rows 2 through `totals_row`.
    let totals_row = last_data_row + 1;
    worksheet.write_string_with_format(totals_row, 0, TOTAL_LABEL, &bold)?;
    if !rows.is_empty() {
        for col in SUMMED_COLUMNS {
            let letter = column_letter(col);
            let sum: i64 = rows.iter().map(|row| quantity(row, col)).sum();
            let formula = Formula::new(format!("=SUM({letter}2:{letter}{totals_row})"))
                .set_result(sum.to_string());
            worksheet.write_formula_with_format(totals_row, col, formula, &bold)?;
        }
        let letter = column_letter(PERCENTAGE_COLUMN);
        let mean = rows.iter().map(|row| row.percentage / 100.0).sum::<f64>() / rows.len() as f64;
        let formula = Formula::new(format!("=AVERAGE({letter}2:{letter}{totals_row})"))
            .set_result(mean.to_string());
        worksheet.write_formula_with_format(
            totals_row,
            PERCENTAGE_COLUMN,
            formula,
            &bold_percent,
        )?;
    }

    worksheet.autofit();
    Ok(())
}

/// Write `rows` as an `.xlsx` workbook; returns the number of data rows.
pub fn write_resources_workbook(path: &Path, rows: &[ResourceRow]) -> Result<usize, ReportError> {
    let xlsx_error = |source| ReportError::Xlsx {
        path: path.to_path_buf(),
        source,
    };
    let mut workbook = Workbook::new();
    fill(workbook.add_worksheet(), rows).map_err(xlsx_error)?;
    workbook.save(path).map_err(xlsx_error)?;
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_letters_cover_the_report() {
        assert_eq!(column_letter(0), 'A');
        assert_eq!(column_letter(PERCENTAGE_COLUMN), 'J');
    }

    #[test]
    fn quantity_columns_follow_the_header() {
        for col in SUMMED_COLUMNS {
            assert!(
                ["Total", "Spent", "Needed", "Owned", "Missing"]
                    .contains(&RESOURCE_HEADER[usize::from(col)]),
                "column {col}"
            );
        }
        assert_eq!(RESOURCE_HEADER[usize::from(PERCENTAGE_COLUMN)], "Percentage");
    }
}
