//! Layout schema: the single source of truth for where every row, total and
//! cross-sheet reference lives.
//!
//! Every sheet shares the same frame: a title row, a navigation row, a
//! spacer, a header row, then data starting on the fifth spreadsheet row.
//! Category sheets end their data with one total row directly below the last
//! category. Formulas never carry coordinates; they carry [`Anchor`]s and
//! [`Span`]s which this module resolves against the current layout.

mod categories;
mod coords;
mod standard;

pub use categories::{
    ASSET_CATEGORIES, EXPENSE_CATEGORIES, FLOW_STEPS, GOAL_NAMES, INCOME_CATEGORIES,
    LIABILITY_CATEGORIES,
};
pub use coords::{column_letters, sheet_prefix, CellRef, RangeRef, RowSpan};
pub use standard::columns;

use std::{collections::HashSet, fmt};

use tracing::debug;

use crate::{
    errors::{TemplateError, TemplateResult},
    formula::{Formula, Resolver},
};

pub const TITLE_ROW: u32 = 0;
pub const NAV_ROW: u32 = 1;
pub const HEADER_ROW: u32 = 3;
pub const FIRST_DATA_ROW: u32 = 4;
pub const LABEL_COLUMN: u16 = 0;
/// Column holding the value on key-value sheets.
pub const VALUE_COLUMN: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SheetId {
    Dashboard,
    Income,
    Expenses,
    Assets,
    Liabilities,
    Goals,
    Calculations,
    FinancialFlow,
}

impl SheetId {
    /// Output order of the workbook.
    pub const ALL: [SheetId; 8] = [
        SheetId::Dashboard,
        SheetId::Income,
        SheetId::Expenses,
        SheetId::Assets,
        SheetId::Liabilities,
        SheetId::Goals,
        SheetId::Calculations,
        SheetId::FinancialFlow,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SheetId::Dashboard => "Dashboard",
            SheetId::Income => "Income",
            SheetId::Expenses => "Expenses",
            SheetId::Assets => "Assets",
            SheetId::Liabilities => "Liabilities",
            SheetId::Goals => "Goals",
            SheetId::Calculations => "Calculations",
            SheetId::FinancialFlow => "Financial Flow",
        }
    }
}

impl fmt::Display for SheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a cell is presented. Header and Total double as row roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayKind {
    Currency,
    Percentage,
    Date,
    Plain,
    Header,
    Total,
}

/// Where a formula is being placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub sheet: SheetId,
    pub row: u32,
}

impl Position {
    pub fn new(sheet: SheetId, row: u32) -> Self {
        Self { sheet, row }
    }
}

/// Symbolic single-cell reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anchor {
    /// Another column on the row the formula sits in.
    SameRow { column: u16 },
    /// The total cell of a category sheet column.
    Total { sheet: SheetId, column: u16 },
    /// A category row, looked up by label.
    Category {
        sheet: SheetId,
        label: String,
        column: u16,
    },
    /// A keyed row on a key-value sheet.
    Entry { sheet: SheetId, key: String },
}

impl Anchor {
    pub fn same_row(column: u16) -> Self {
        Anchor::SameRow { column }
    }

    pub fn total(sheet: SheetId, column: u16) -> Self {
        Anchor::Total { sheet, column }
    }

    pub fn category(sheet: SheetId, label: impl Into<String>, column: u16) -> Self {
        Anchor::Category {
            sheet,
            label: label.into(),
            column,
        }
    }

    pub fn entry(sheet: SheetId, key: impl Into<String>) -> Self {
        Anchor::Entry {
            sheet,
            key: key.into(),
        }
    }
}

/// Symbolic range: one column across all category rows of a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub sheet: SheetId,
    pub column: u16,
}

impl Span {
    pub fn categories(sheet: SheetId, column: u16) -> Self {
        Self { sheet, column }
    }
}

/// Literal or formula content of a key-value row.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueSpec {
    Number(f64),
    Text(String),
    Formula(Formula),
}

/// How a column of a category sheet is populated for each category row.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnFill {
    /// The category label.
    Label,
    Constant(f64),
    Text(String),
    Formula(Formula),
    Blank,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub header: String,
    pub width: f64,
    pub kind: DisplayKind,
    pub fill: ColumnFill,
    pub totalled: bool,
}

impl ColumnSpec {
    pub fn new(header: impl Into<String>, width: f64, kind: DisplayKind, fill: ColumnFill) -> Self {
        Self {
            header: header.into(),
            width,
            kind,
            fill,
            totalled: false,
        }
    }

    pub fn totalled(mut self) -> Self {
        self.totalled = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryItem {
    pub label: String,
}

impl CategoryItem {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

/// One row of a key-value sheet. Rows without a value are section headers.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub key: String,
    pub label: String,
    pub value: Option<ValueSpec>,
    pub kind: DisplayKind,
    /// Plain text written to the columns right of the value.
    pub details: Vec<String>,
}

impl Entry {
    pub fn section(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            value: None,
            kind: DisplayKind::Header,
            details: Vec::new(),
        }
    }

    pub fn text(
        key: impl Into<String>,
        label: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            value: Some(ValueSpec::Text(text.into())),
            kind: DisplayKind::Plain,
            details: Vec::new(),
        }
    }

    pub fn number(
        key: impl Into<String>,
        label: impl Into<String>,
        value: f64,
        kind: DisplayKind,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            value: Some(ValueSpec::Number(value)),
            kind,
            details: Vec::new(),
        }
    }

    pub fn formula(
        key: impl Into<String>,
        label: impl Into<String>,
        formula: Formula,
        kind: DisplayKind,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            value: Some(ValueSpec::Formula(formula)),
            kind,
            details: Vec::new(),
        }
    }

    pub fn with_details<I>(mut self, details: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.details = details.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SheetBody {
    Categories {
        items: Vec<CategoryItem>,
        total_label: String,
    },
    Entries(Vec<Entry>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    pub id: SheetId,
    pub title: String,
    pub columns: Vec<ColumnSpec>,
    pub body: SheetBody,
}

impl SheetLayout {
    pub fn name(&self) -> &'static str {
        self.id.name()
    }

    /// Rows holding the category list, `None` for key-value sheets.
    pub fn category_rows(&self) -> Option<RowSpan> {
        match &self.body {
            SheetBody::Categories { items, .. } if !items.is_empty() => Some(RowSpan {
                first: FIRST_DATA_ROW,
                last: FIRST_DATA_ROW + items.len() as u32 - 1,
            }),
            _ => None,
        }
    }

    /// The row directly below the last category.
    pub fn total_row(&self) -> Option<u32> {
        self.category_rows().map(|span| span.last + 1)
    }

    /// Total cell for a column, if the column is totalled.
    pub fn total_cell(&self, column: u16) -> Option<CellRef> {
        let spec = self.columns.get(column as usize)?;
        if !spec.totalled {
            return None;
        }
        self.total_row().map(|row| CellRef::new(row, column))
    }

    pub fn category_row(&self, label: &str) -> Option<u32> {
        match &self.body {
            SheetBody::Categories { items, .. } => items
                .iter()
                .position(|item| item.label == label)
                .map(|idx| FIRST_DATA_ROW + idx as u32),
            SheetBody::Entries(_) => None,
        }
    }

    pub fn entry(&self, key: &str) -> Option<(u32, &Entry)> {
        match &self.body {
            SheetBody::Entries(entries) => entries
                .iter()
                .enumerate()
                .find(|(_, entry)| entry.key == key)
                .map(|(idx, entry)| (FIRST_DATA_ROW + idx as u32, entry)),
            SheetBody::Categories { .. } => None,
        }
    }

    /// Data rows below the header, total row included.
    pub fn data_row_count(&self) -> usize {
        match &self.body {
            SheetBody::Categories { items, .. } => items.len() + 1,
            SheetBody::Entries(entries) => entries.len(),
        }
    }

    pub fn items(&self) -> &[CategoryItem] {
        match &self.body {
            SheetBody::Categories { items, .. } => items,
            SheetBody::Entries(_) => &[],
        }
    }

    pub fn items_mut(&mut self) -> Option<&mut Vec<CategoryItem>> {
        match &mut self.body {
            SheetBody::Categories { items, .. } => Some(items),
            SheetBody::Entries(_) => None,
        }
    }

    pub fn entries_mut(&mut self) -> Option<&mut Vec<Entry>> {
        match &mut self.body {
            SheetBody::Entries(entries) => Some(entries),
            SheetBody::Categories { .. } => None,
        }
    }

    fn column(&self, column: u16) -> TemplateResult<&ColumnSpec> {
        self.columns.get(column as usize).ok_or_else(|| {
            TemplateError::schema(format!(
                "sheet `{}` has no column {}",
                self.name(),
                column_letters(column)
            ))
        })
    }
}

/// A formula together with the cell it will be written to.
#[derive(Debug, Clone, PartialEq)]
pub struct FormulaSite {
    pub at: Position,
    pub column: u16,
    pub formula: Formula,
}

impl FormulaSite {
    pub fn cell(&self) -> CellRef {
        CellRef::new(self.at.row, self.column)
    }
}

/// The full workbook layout, one [`SheetLayout`] per [`SheetId`] in output order.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    sheets: Vec<SheetLayout>,
}

impl Schema {
    pub fn new(sheets: Vec<SheetLayout>) -> Self {
        Self { sheets }
    }

    pub fn sheets(&self) -> &[SheetLayout] {
        &self.sheets
    }

    pub fn sheet(&self, id: SheetId) -> Option<&SheetLayout> {
        self.sheets.iter().find(|sheet| sheet.id == id)
    }

    pub fn sheet_mut(&mut self, id: SheetId) -> Option<&mut SheetLayout> {
        self.sheets.iter_mut().find(|sheet| sheet.id == id)
    }

    fn require(&self, id: SheetId) -> TemplateResult<&SheetLayout> {
        self.sheet(id)
            .ok_or_else(|| TemplateError::schema(format!("sheet `{id}` is not defined")))
    }

    /// Absolute coordinate of a sheet's total cell for `column`.
    pub fn total_cell(&self, id: SheetId, column: u16) -> TemplateResult<CellRef> {
        let sheet = self.require(id)?;
        sheet.column(column)?;
        sheet.total_cell(column).ok_or_else(|| {
            TemplateError::schema(format!(
                "sheet `{id}` has no total for column {}",
                column_letters(column)
            ))
        })
    }

    /// The category rows of `span.sheet` in `span.column`.
    pub fn category_range(&self, span: &Span) -> TemplateResult<RangeRef> {
        let sheet = self.require(span.sheet)?;
        sheet.column(span.column)?;
        sheet
            .category_rows()
            .map(|rows| rows.column(span.column))
            .ok_or_else(|| {
                TemplateError::schema(format!("sheet `{}` has no category rows", span.sheet))
            })
    }

    /// Coordinate an anchor points at when used from `at`.
    pub fn locate(&self, anchor: &Anchor, at: Position) -> TemplateResult<(SheetId, CellRef)> {
        match anchor {
            Anchor::SameRow { column } => {
                let sheet = self.require(at.sheet)?;
                sheet.column(*column)?;
                let in_category = sheet
                    .category_rows()
                    .map(|rows| rows.contains(at.row))
                    .unwrap_or(false);
                if !in_category {
                    return Err(TemplateError::schema(format!(
                        "same-row reference used outside a category row on `{}` row {}",
                        at.sheet,
                        at.row + 1
                    )));
                }
                Ok((at.sheet, CellRef::new(at.row, *column)))
            }
            Anchor::Total { sheet, column } => Ok((*sheet, self.total_cell(*sheet, *column)?)),
            Anchor::Category {
                sheet,
                label,
                column,
            } => {
                let layout = self.require(*sheet)?;
                layout.column(*column)?;
                let row = layout.category_row(label).ok_or_else(|| {
                    TemplateError::schema(format!("sheet `{sheet}` has no category `{label}`"))
                })?;
                Ok((*sheet, CellRef::new(row, *column)))
            }
            Anchor::Entry { sheet, key } => {
                let layout = self.require(*sheet)?;
                let (row, entry) = layout.entry(key).ok_or_else(|| {
                    TemplateError::schema(format!("sheet `{sheet}` has no entry `{key}`"))
                })?;
                if entry.value.is_none() {
                    return Err(TemplateError::schema(format!(
                        "entry `{key}` on `{sheet}` is a section header and holds no value"
                    )));
                }
                Ok((*sheet, CellRef::new(row, VALUE_COLUMN)))
            }
        }
    }

    /// Every formula the layout will emit, totals included, with its target cell.
    pub fn formula_sites(&self) -> Vec<FormulaSite> {
        let mut sites = Vec::new();
        for sheet in &self.sheets {
            match &sheet.body {
                SheetBody::Categories { .. } => {
                    let Some(rows) = sheet.category_rows() else {
                        continue;
                    };
                    for row in rows.first..=rows.last {
                        for (col, column) in sheet.columns.iter().enumerate() {
                            if let ColumnFill::Formula(formula) = &column.fill {
                                sites.push(FormulaSite {
                                    at: Position::new(sheet.id, row),
                                    column: col as u16,
                                    formula: formula.clone(),
                                });
                            }
                        }
                    }
                    for (col, column) in sheet.columns.iter().enumerate() {
                        if column.totalled {
                            sites.push(FormulaSite {
                                at: Position::new(sheet.id, rows.last + 1),
                                column: col as u16,
                                formula: Formula::Sum(Span::categories(sheet.id, col as u16)),
                            });
                        }
                    }
                }
                SheetBody::Entries(entries) => {
                    for (idx, entry) in entries.iter().enumerate() {
                        if let Some(ValueSpec::Formula(formula)) = &entry.value {
                            sites.push(FormulaSite {
                                at: Position::new(sheet.id, FIRST_DATA_ROW + idx as u32),
                                column: VALUE_COLUMN,
                                formula: formula.clone(),
                            });
                        }
                    }
                }
            }
        }
        sites
    }

    /// Checks structure and resolves every formula once, before anything is written.
    pub fn validate(&self) -> TemplateResult<()> {
        if self.sheets.len() != SheetId::ALL.len() {
            return Err(TemplateError::schema(format!(
                "expected {} sheets, found {}",
                SheetId::ALL.len(),
                self.sheets.len()
            )));
        }
        for (sheet, expected) in self.sheets.iter().zip(SheetId::ALL) {
            if sheet.id != expected {
                return Err(TemplateError::schema(format!(
                    "sheet `{}` found where `{expected}` belongs",
                    sheet.id
                )));
            }
            self.validate_sheet(sheet)?;
        }

        let sites = self.formula_sites();
        for site in &sites {
            site.formula.render(self, site.at).map_err(|err| match err {
                TemplateError::SchemaInconsistency(message) => TemplateError::schema(format!(
                    "{}!{}: {message}",
                    site.at.sheet,
                    site.cell()
                )),
                other => other,
            })?;
        }
        debug!(formulas = sites.len(), "schema validated");
        Ok(())
    }

    fn validate_sheet(&self, sheet: &SheetLayout) -> TemplateResult<()> {
        if sheet.columns.len() < 2 {
            return Err(TemplateError::schema(format!(
                "sheet `{}` needs a label and a value column",
                sheet.id
            )));
        }
        match &sheet.body {
            SheetBody::Categories { items, total_label } => {
                if items.is_empty() {
                    return Err(TemplateError::schema(format!(
                        "sheet `{}` has an empty category list",
                        sheet.id
                    )));
                }
                if total_label.trim().is_empty() {
                    return Err(TemplateError::schema(format!(
                        "sheet `{}` has no total label",
                        sheet.id
                    )));
                }
                if sheet.columns[LABEL_COLUMN as usize].fill != ColumnFill::Label {
                    return Err(TemplateError::schema(format!(
                        "sheet `{}` must label categories in column A",
                        sheet.id
                    )));
                }
                if let Some(column) = sheet
                    .columns
                    .iter()
                    .find(|column| column.totalled && column.fill == ColumnFill::Label)
                {
                    return Err(TemplateError::schema(format!(
                        "sheet `{}` totals its label column `{}`",
                        sheet.id, column.header
                    )));
                }
                let mut labels = HashSet::new();
                for item in items {
                    if !labels.insert(item.label.as_str()) {
                        return Err(TemplateError::schema(format!(
                            "category `{}` appears twice on `{}`",
                            item.label, sheet.id
                        )));
                    }
                }
            }
            SheetBody::Entries(entries) => {
                let mut keys = HashSet::new();
                for entry in entries {
                    if !keys.insert(entry.key.as_str()) {
                        return Err(TemplateError::schema(format!(
                            "entry key `{}` appears twice on `{}`",
                            entry.key, sheet.id
                        )));
                    }
                    let needed = VALUE_COLUMN as usize + 1 + entry.details.len();
                    if !entry.details.is_empty() && needed > sheet.columns.len() {
                        return Err(TemplateError::schema(format!(
                            "entry `{}` on `{}` needs {needed} columns, sheet has {}",
                            entry.key,
                            sheet.id,
                            sheet.columns.len()
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

impl Resolver for Schema {
    fn cell(&self, anchor: &Anchor, at: Position) -> TemplateResult<String> {
        let (sheet, cell) = self.locate(anchor, at)?;
        if sheet == at.sheet {
            Ok(cell.to_string())
        } else {
            Ok(format!("{}{cell}", sheet_prefix(sheet.name())))
        }
    }

    fn range(&self, span: &Span, at: Position) -> TemplateResult<String> {
        let range = self.category_range(span)?;
        if span.sheet == at.sheet {
            Ok(range.to_string())
        } else {
            Ok(format!("{}{range}", sheet_prefix(span.sheet.name())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        Schema::standard()
    }

    #[test]
    fn standard_schema_validates() {
        schema().validate().expect("standard schema is consistent");
    }

    #[test]
    fn totals_sit_directly_below_categories() {
        let schema = schema();
        let income = schema.sheet(SheetId::Income).unwrap();
        assert_eq!(income.category_rows(), Some(RowSpan { first: 4, last: 15 }));
        assert_eq!(
            schema
                .total_cell(SheetId::Income, columns::AMOUNT)
                .unwrap()
                .to_string(),
            "B17"
        );
    }

    #[test]
    fn cross_sheet_reference_gets_prefix() {
        let schema = schema();
        let at = Position::new(SheetId::Dashboard, FIRST_DATA_ROW);
        let text = schema
            .cell(&Anchor::total(SheetId::Income, columns::AMOUNT), at)
            .unwrap();
        assert_eq!(text, "Income!B17");

        let local = Position::new(SheetId::Income, FIRST_DATA_ROW);
        let text = schema
            .cell(&Anchor::total(SheetId::Income, columns::AMOUNT), local)
            .unwrap();
        assert_eq!(text, "B17");
    }

    #[test]
    fn unknown_entry_is_inconsistent() {
        let schema = schema();
        let at = Position::new(SheetId::Dashboard, FIRST_DATA_ROW);
        let err = schema
            .cell(&Anchor::entry(SheetId::Calculations, "nope"), at)
            .unwrap_err();
        assert!(matches!(err, TemplateError::SchemaInconsistency(_)));
    }

    #[test]
    fn total_of_untotalled_column_is_inconsistent() {
        let schema = schema();
        let err = schema
            .total_cell(SheetId::Liabilities, columns::liabilities::RATE)
            .unwrap_err();
        assert!(err.to_string().contains("no total"));
    }

    #[test]
    fn same_row_outside_category_rows_is_rejected() {
        let schema = schema();
        let at = Position::new(SheetId::Dashboard, FIRST_DATA_ROW);
        assert!(schema.locate(&Anchor::same_row(1), at).is_err());
    }

    #[test]
    fn validate_rejects_out_of_order_sheets() {
        let mut sheets = schema().sheets().to_vec();
        sheets.swap(1, 2);
        let err = Schema::new(sheets).validate().unwrap_err();
        assert!(err.to_string().contains("Expenses"));
    }

    #[test]
    fn validate_rejects_duplicate_category() {
        let mut schema = schema();
        schema
            .sheet_mut(SheetId::Goals)
            .and_then(SheetLayout::items_mut)
            .unwrap()
            .push(CategoryItem::new("Car Purchase"));
        let err = schema.validate().unwrap_err();
        assert!(err.to_string().contains("`Car Purchase` appears twice"));
    }

    #[test]
    fn validate_rejects_details_wider_than_sheet() {
        let mut schema = schema();
        schema
            .sheet_mut(SheetId::Calculations)
            .and_then(SheetLayout::entries_mut)
            .unwrap()
            .push(Entry::text("wide", "Wide", "text").with_details(["a", "b", "c"]));
        let err = schema.validate().unwrap_err();
        assert!(err.to_string().contains("entry `wide`"), "{err}");
    }

    #[test]
    fn validate_reports_the_cell_holding_a_dangling_reference() {
        let mut schema = schema();
        schema
            .sheet_mut(SheetId::Dashboard)
            .and_then(SheetLayout::entries_mut)
            .unwrap()
            .push(Entry::formula(
                "dangling",
                "Dangling",
                Formula::Reference(Anchor::category(SheetId::Assets, "Yacht", columns::AMOUNT)),
                DisplayKind::Currency,
            ));
        let err = schema.validate().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Dashboard!B"), "{message}");
        assert!(message.contains("Yacht"), "{message}");
    }
}
