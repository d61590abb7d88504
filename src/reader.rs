use crate::error::{Error, Result};
use crate::writer::{CellEvent, Document, MacroModule, SheetData};
use calamine::{open_workbook_auto, CellType, Range, Reader, Sheets};
use ssfmt::{FormatOptions, NumberFormat};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::io::{Read, Seek};
use std::path::Path;
use umya_spreadsheet::structs::{Cell, Worksheet};

/// Cell text keyed by zero-based (row, column), which iterates in reading order.
type CellMap = BTreeMap<(i64, i64), String>;

/// Read every sheet and VBA module of a workbook.
pub fn open_document(path: &Path) -> Result<Document> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let (sheets, macros) = match extension.as_str() {
        "xlsx" | "xlsm" => {
            let sheets = read_xlsx_sheets(path)?;
            let mut workbook = open_workbook_auto(path).map_err(|e| {
                log::error!("calamine cannot open {} for macros: {}", path.display(), e);
                Error::InvalidMacros {
                    path: path.to_path_buf(),
                    details: format!("calamine: {}", e),
                }
            })?;
            (sheets, read_macros(path, &mut workbook)?)
        }
        "xls" | "xlsb" | "ods" => {
            let mut workbook = open_workbook_auto(path).map_err(|e| Error::InvalidExcel {
                path: path.to_path_buf(),
                details: format!("calamine: {}", e),
            })?;
            let sheets = read_calamine_sheets(path, &mut workbook)?;
            (sheets, read_macros(path, &mut workbook)?)
        }
        _ => return Err(Error::UnsupportedFormat(extension)),
    };

    log::info!(
        "read {}: {} sheets, {} macro modules",
        path.display(),
        sheets.len(),
        macros.len()
    );

    Ok(Document { sheets, macros })
}

fn into_sheet_data(name: String, cells: CellMap) -> SheetData {
    let events = cells
        .into_iter()
        .map(|((row, column), text)| CellEvent {
            row,
            column: Some(column),
            text,
        })
        .collect();
    SheetData { name, events }
}

fn read_xlsx_sheets(path: &Path) -> Result<Vec<SheetData>> {
    let workbook = umya_spreadsheet::reader::xlsx::read(path).map_err(|e| Error::InvalidExcel {
        path: path.to_path_buf(),
        details: format!("umya: {}", e),
    })?;

    let opts = FormatOptions::default();
    Ok(workbook
        .get_sheet_collection()
        .iter()
        .map(|sheet| worksheet_data(sheet, &opts))
        .collect())
}

/// Only stored cells are visited, so sparse sheets cost what they contain.
fn worksheet_data(sheet: &Worksheet, opts: &FormatOptions) -> SheetData {
    let mut cells = CellMap::new();
    for cell in sheet.get_cell_collection() {
        let text = cell_text(cell, opts);
        if text.is_empty() {
            continue;
        }
        let coordinate = cell.get_coordinate();
        let row = i64::from(*coordinate.get_row_num()) - 1;
        let column = i64::from(*coordinate.get_col_num()) - 1;
        cells.insert((row, column), text);
    }

    log::debug!("sheet {}: {} cells", sheet.get_name(), cells.len());
    into_sheet_data(sheet.get_name().to_string(), cells)
}

/// Formula text when the cell has one, otherwise the formatted value.
fn cell_text(cell: &Cell, opts: &FormatOptions) -> String {
    let formula = cell.get_formula();
    if !formula.is_empty() {
        return formula.to_string();
    }

    let raw_value = cell.get_value();
    if raw_value.is_empty() {
        return String::new();
    }

    let format_code = cell
        .get_style()
        .get_number_format()
        .map(|nf| nf.get_format_code())
        .unwrap_or("General");

    let fmt = match NumberFormat::parse(format_code) {
        Ok(f) => f,
        Err(_) => {
            log::warn!("unparseable number format {:?}, using raw value", format_code);
            return raw_value.to_string();
        }
    };

    // Dates are serial numbers too
    if let Ok(num) = raw_value.parse::<f64>() {
        return fmt.format(num, opts);
    }

    fmt.format_text(&raw_value, opts)
}

fn insert_used_cells<T: CellType + Display>(cells: &mut CellMap, range: &Range<T>) {
    let Some((first_row, first_col)) = range.start() else {
        return;
    };
    for (row, col, value) in range.used_cells() {
        let text = value.to_string();
        if text.is_empty() {
            continue;
        }
        cells.insert(
            (
                i64::from(first_row) + row as i64,
                i64::from(first_col) + col as i64,
            ),
            text,
        );
    }
}

fn read_calamine_sheets<RS: Read + Seek>(
    path: &Path,
    workbook: &mut Sheets<RS>,
) -> Result<Vec<SheetData>> {
    let invalid = |details: String| Error::InvalidExcel {
        path: path.to_path_buf(),
        details: format!("calamine: {}", details),
    };

    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let values = workbook
            .worksheet_range(&name)
            .map_err(|e| invalid(format!("sheet {}: {}", name, e)))?;
        let formulas = workbook
            .worksheet_formula(&name)
            .map_err(|e| invalid(format!("formulas of sheet {}: {}", name, e)))?;

        let mut cells = CellMap::new();
        insert_used_cells(&mut cells, &values);
        insert_used_cells(&mut cells, &formulas);

        log::debug!("sheet {}: {} cells", name, cells.len());
        sheets.push(into_sheet_data(name, cells));
    }

    Ok(sheets)
}

/// Source of every VBA module, or nothing when the workbook has no VBA project.
fn read_macros<RS: Read + Seek>(
    path: &Path,
    workbook: &mut Sheets<RS>,
) -> Result<Vec<MacroModule>> {
    let invalid = |details: String| Error::InvalidMacros {
        path: path.to_path_buf(),
        details: format!("calamine: {}", details),
    };

    let Some(project) = workbook.vba_project() else {
        log::debug!("{}: no VBA project", path.display());
        return Ok(Vec::new());
    };
    let project = project.map_err(|e| invalid(e.to_string()))?;

    let mut modules = Vec::new();
    for name in project.get_module_names() {
        let source = project
            .get_module(name)
            .map_err(|e| invalid(format!("module {}: {}", name, e)))?;
        modules.push(MacroModule {
            name: name.to_string(),
            source,
        });
    }
    Ok(modules)
}
