//! Box-drawn text rendering of sheet rows.
//!
//! Every rendered row is a header line carrying the address of each cell,
//! followed by the cell text laid out in columns. Border glyphs encode two
//! signals: a double vertical (`╥`/`╦`/`║`) marks skipped columns between two
//! cells, and the double horizontal set (`═`/`╤`/`╦`) marks that blank rows
//! were skipped above the row.

use crate::address;
use crate::error::Result;
use std::io::Write;

/// Narrowest content width of a rendered cell.
pub const MIN_CELL_WIDTH: usize = 40;

/// One occupied cell of the row being rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub column: i64,
    pub lines: Vec<String>,
    pub width: usize,
}

impl Cell {
    pub fn new(column: i64, text: &str) -> Self {
        let lines: Vec<String> = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();
        let width = lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0)
            .max(MIN_CELL_WIDTH);

        Self {
            column,
            lines,
            width,
        }
    }

    /// Text at a wrap level. An empty line counts as no line at all.
    fn line_at(&self, level: usize) -> Option<&str> {
        self.lines
            .get(level)
            .map(String::as_str)
            .filter(|line| !line.is_empty())
    }
}

/// Receiver of the cells of one sheet, row by row.
///
/// Rows must arrive in ascending order and cells within a row in ascending
/// column order; implementations do not sort.
pub trait SheetContents {
    fn start_row(&mut self, row: i64);

    /// `column` is `None` when the cell event carries no reference; such
    /// events are dropped.
    fn add_cell(&mut self, column: Option<i64>, text: &str);

    fn end_row(&mut self, row: i64) -> Result<()>;
}

struct Glyphs {
    fill: char,
    junction: char,
    gap_junction: char,
}

const LIGHT: Glyphs = Glyphs {
    fill: '─',
    junction: '┬',
    gap_junction: '╥',
};

const HEAVY: Glyphs = Glyphs {
    fill: '═',
    junction: '╤',
    gap_junction: '╦',
};

/// Renders the rows of a single sheet to `out`.
///
/// Tracks the last row it emitted so it can flag skipped rows; start a new
/// renderer for every sheet.
pub struct RowRenderer<W: Write> {
    out: W,
    cells: Vec<Cell>,
    last_emitted_row: i64,
}

impl<W: Write> RowRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            cells: Vec::new(),
            last_emitted_row: -1,
        }
    }

    pub fn last_emitted_row(&self) -> i64 {
        self.last_emitted_row
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SheetContents for RowRenderer<W> {
    fn start_row(&mut self, _row: i64) {
        self.cells.clear();
    }

    fn add_cell(&mut self, column: Option<i64>, text: &str) {
        if let Some(column) = column {
            self.cells.push(Cell::new(column, text));
        }
    }

    fn end_row(&mut self, row: i64) -> Result<()> {
        if self.cells.is_empty() {
            return Ok(());
        }

        let row_gap = row != self.last_emitted_row + 1;
        let cells = std::mem::take(&mut self.cells);
        let block = render_row(row, &cells, row_gap)?;
        self.out.write_all(block.as_bytes())?;
        self.last_emitted_row = row;
        Ok(())
    }
}

/// Render one non-empty row: the address header followed by the content lines.
pub fn render_row(row: i64, cells: &[Cell], row_gap: bool) -> Result<String> {
    let mut block = header_line(row, cells, row_gap)?;
    push_content_lines(&mut block, cells);
    Ok(block)
}

fn header_line(row: i64, cells: &[Cell], row_gap: bool) -> Result<String> {
    let glyphs = if row_gap { &HEAVY } else { &LIGHT };
    let mut line = String::new();
    let mut previous_column = -1;

    for (position, cell) in cells.iter().enumerate() {
        if position > 0 {
            line.push(if cell.column == previous_column + 1 {
                glyphs.junction
            } else {
                glyphs.gap_junction
            });
        }

        let address = address::encode(row, cell.column)?;
        line.push(glyphs.fill);
        line.push(' ');
        line.push_str(&address);
        line.push(' ');
        // fill + two spaces + address + trailing fill == width + 2
        let trailing = (cell.width + 2).saturating_sub(3 + address.len());
        line.extend(std::iter::repeat(glyphs.fill).take(trailing));

        previous_column = cell.column;
    }

    line.push('\n');
    Ok(line)
}

fn push_content_lines(block: &mut String, cells: &[Cell]) {
    let last = cells.len().saturating_sub(1);
    let mut level = 0;

    loop {
        let mut all_done = true;
        let mut previous_column = -1;

        for (position, cell) in cells.iter().enumerate() {
            if position > 0 {
                block.push(if cell.column == previous_column + 1 {
                    '│'
                } else {
                    '║'
                });
            }

            match cell.line_at(level) {
                Some(text) => {
                    all_done = false;
                    block.push(' ');
                    block.push_str(text);
                    if position < last {
                        push_spaces(block, cell.width - text.chars().count() + 1);
                    }
                }
                None => {
                    if position < last {
                        push_spaces(block, cell.width + 2);
                    }
                }
            }

            previous_column = cell.column;
        }

        block.push('\n');
        level += 1;

        if all_done {
            break;
        }
    }
}

fn push_spaces(block: &mut String, count: usize) {
    block.extend(std::iter::repeat(' ').take(count));
}
