use crate::error::Result;
use crate::macros::MacroNormalizer;
use crate::render::{RowRenderer, SheetContents};
use std::io::Write;

/// One occupied cell as reported by a workbook reader. Coordinates are zero-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellEvent {
    pub row: i64,
    pub column: Option<i64>,
    pub text: String,
}

/// Cell events of one sheet, ordered by row then column.
#[derive(Debug, Clone, Default)]
pub struct SheetData {
    pub name: String,
    pub events: Vec<CellEvent>,
}

#[derive(Debug, Clone)]
pub struct MacroModule {
    pub name: String,
    pub source: String,
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    pub sheets: Vec<SheetData>,
    pub macros: Vec<MacroModule>,
}

/// Feed ordered cell events to `handler`, one start/end pair per distinct row.
pub fn drive_sheet<'a, I, H>(events: I, handler: &mut H) -> Result<()>
where
    I: IntoIterator<Item = &'a CellEvent>,
    H: SheetContents,
{
    let mut current_row: Option<i64> = None;

    for event in events {
        if current_row != Some(event.row) {
            if let Some(row) = current_row {
                handler.end_row(row)?;
            }
            handler.start_row(event.row);
            current_row = Some(event.row);
        }
        handler.add_cell(event.column, &event.text);
    }

    if let Some(row) = current_row {
        handler.end_row(row)?;
    }
    Ok(())
}

pub fn write_sheet<W: Write>(out: &mut W, sheet: &SheetData) -> Result<()> {
    log::debug!("rendering sheet {} ({} cells)", sheet.name, sheet.events.len());

    writeln!(out)?;
    writeln!(out, "sheet {} {{", sheet.name)?;
    let mut renderer = RowRenderer::new(&mut *out);
    drive_sheet(&sheet.events, &mut renderer)?;
    log::trace!("sheet {} ends at row {}", sheet.name, renderer.last_emitted_row());
    writeln!(out, "}}")?;
    Ok(())
}

pub fn write_sheets<W: Write>(out: &mut W, sheets: &[SheetData]) -> Result<()> {
    writeln!(out, "Sheets {{")?;
    for sheet in sheets {
        write_sheet(out, sheet)?;
    }
    writeln!(out, "}}")?;
    Ok(())
}

pub fn write_macros<W: Write>(out: &mut W, modules: &[MacroModule]) -> Result<()> {
    let normalizer = MacroNormalizer::new();

    writeln!(out, "Macros {{")?;
    for module in modules {
        log::debug!("writing module {} ({} bytes)", module.name, module.source.len());
        writeln!(out, "module {} {{", module.name)?;
        writeln!(out, "{}", normalizer.normalize(&module.name, &module.source))?;
        writeln!(out, "}}")?;
    }
    writeln!(out, "}}")?;
    Ok(())
}

pub fn write_document<W: Write>(out: &mut W, document: &Document) -> Result<()> {
    write_sheets(out, &document.sheets)?;
    write_macros(out, &document.macros)?;
    out.flush()?;
    Ok(())
}
