//! Materialized workbook: every row and cell placed, every formula resolved.

use tracing::{debug, info};

use crate::{
    errors::TemplateResult,
    layout::{
        CellRef, ColumnFill, DisplayKind, Position, Schema, SheetBody, SheetId, SheetLayout, Span,
        ValueSpec, FIRST_DATA_ROW, LABEL_COLUMN, VALUE_COLUMN,
    },
    formula::Formula,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    /// Formula body without the leading `=`.
    Formula(String),
}

impl Value {
    pub fn as_formula(&self) -> Option<&str> {
        match self {
            Value::Formula(formula) => Some(formula),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub column: u16,
    pub value: Value,
    pub kind: DisplayKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Zero-based worksheet row.
    pub index: u32,
    pub kind: DisplayKind,
    /// Label first, then the populated value columns in order.
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn label(&self) -> &str {
        self.cells
            .first()
            .and_then(|cell| cell.value.as_text())
            .unwrap_or_default()
    }

    pub fn cell(&self, column: u16) -> Option<&Cell> {
        self.cells.iter().find(|cell| cell.column == column)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub header: String,
    pub width: f64,
    pub kind: DisplayKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub id: SheetId,
    pub title: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

impl Sheet {
    pub fn name(&self) -> &'static str {
        self.id.name()
    }

    pub fn cell_at(&self, cell: CellRef) -> Option<&Cell> {
        self.rows
            .iter()
            .find(|row| row.index == cell.row)
            .and_then(|row| row.cell(cell.col))
    }

    pub fn formula_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| &row.cells)
            .filter(|cell| matches!(cell.value, Value::Formula(_)))
            .count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    sheets: Vec<Sheet>,
}

impl Template {
    /// Validates the schema and resolves it into concrete sheets.
    ///
    /// Nothing is written anywhere; a dangling reference fails here with
    /// [`TemplateError::SchemaInconsistency`](crate::errors::TemplateError).
    pub fn build(schema: &Schema) -> TemplateResult<Self> {
        schema.validate()?;
        let sheets = schema
            .sheets()
            .iter()
            .map(|layout| materialize(schema, layout))
            .collect::<TemplateResult<Vec<_>>>()?;
        let formulas: usize = sheets.iter().map(Sheet::formula_count).sum();
        info!(sheets = sheets.len(), formulas, "template materialized");
        Ok(Self { sheets })
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet(&self, id: SheetId) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.id == id)
    }

    /// Formula stored at an A1 address, e.g. `formula_at(SheetId::Income, "B17")`.
    pub fn formula_at(&self, id: SheetId, address: &str) -> Option<&str> {
        let cell = CellRef::parse(address)?;
        self.sheet(id)?.cell_at(cell)?.value.as_formula()
    }
}

fn materialize(schema: &Schema, layout: &SheetLayout) -> TemplateResult<Sheet> {
    let columns = layout
        .columns
        .iter()
        .map(|column| Column {
            header: column.header.clone(),
            width: column.width,
            kind: column.kind,
        })
        .collect();

    let rows = match &layout.body {
        SheetBody::Categories { items, total_label } => {
            let mut rows = Vec::with_capacity(items.len() + 1);
            for (idx, item) in items.iter().enumerate() {
                let index = FIRST_DATA_ROW + idx as u32;
                let at = Position::new(layout.id, index);
                let mut cells = Vec::with_capacity(layout.columns.len());
                for (col, column) in layout.columns.iter().enumerate() {
                    let value = match &column.fill {
                        ColumnFill::Label => Value::Text(item.label.clone()),
                        ColumnFill::Constant(value) => Value::Number(*value),
                        ColumnFill::Text(text) => Value::Text(text.clone()),
                        ColumnFill::Formula(formula) => {
                            Value::Formula(formula.render(schema, at)?)
                        }
                        ColumnFill::Blank => continue,
                    };
                    let kind = if column.fill == ColumnFill::Label {
                        DisplayKind::Plain
                    } else {
                        column.kind
                    };
                    cells.push(Cell {
                        column: col as u16,
                        value,
                        kind,
                    });
                }
                rows.push(Row {
                    index,
                    kind: DisplayKind::Plain,
                    cells,
                });
            }

            let index = FIRST_DATA_ROW + items.len() as u32;
            let at = Position::new(layout.id, index);
            let mut cells = vec![label_cell(total_label, DisplayKind::Total)];
            for (col, column) in layout.columns.iter().enumerate() {
                if !column.totalled {
                    continue;
                }
                let sum = Formula::Sum(Span::categories(layout.id, col as u16));
                cells.push(Cell {
                    column: col as u16,
                    value: Value::Formula(sum.render(schema, at)?),
                    kind: DisplayKind::Total,
                });
            }
            rows.push(Row {
                index,
                kind: DisplayKind::Total,
                cells,
            });
            rows
        }
        SheetBody::Entries(entries) => {
            let mut rows = Vec::with_capacity(entries.len());
            for (idx, entry) in entries.iter().enumerate() {
                let index = FIRST_DATA_ROW + idx as u32;
                let at = Position::new(layout.id, index);
                let row_kind = match entry.kind {
                    DisplayKind::Header | DisplayKind::Total => entry.kind,
                    _ => DisplayKind::Plain,
                };
                let mut cells = vec![label_cell(&entry.label, row_kind)];
                if let Some(spec) = &entry.value {
                    let value = match spec {
                        ValueSpec::Number(value) => Value::Number(*value),
                        ValueSpec::Text(text) => Value::Text(text.clone()),
                        ValueSpec::Formula(formula) => Value::Formula(formula.render(schema, at)?),
                    };
                    cells.push(Cell {
                        column: VALUE_COLUMN,
                        value,
                        kind: entry.kind,
                    });
                }
                for (offset, detail) in entry.details.iter().enumerate() {
                    cells.push(Cell {
                        column: VALUE_COLUMN + 1 + offset as u16,
                        value: Value::Text(detail.clone()),
                        kind: DisplayKind::Plain,
                    });
                }
                rows.push(Row {
                    index,
                    kind: row_kind,
                    cells,
                });
            }
            rows
        }
    };

    let sheet = Sheet {
        id: layout.id,
        title: layout.title.clone(),
        columns,
        rows,
    };
    debug!(
        sheet = sheet.name(),
        rows = sheet.rows.len(),
        formulas = sheet.formula_count(),
        "sheet materialized"
    );
    Ok(sheet)
}

fn label_cell(label: &str, kind: DisplayKind) -> Cell {
    Cell {
        column: LABEL_COLUMN,
        value: Value::Text(label.to_string()),
        kind,
    }
}
