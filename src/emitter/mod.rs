//! Writes a [`Template`] to an xlsx document.
//!
//! Emission is a single pass with no recovery: if writing fails midway the
//! target file is either absent or left partial. An existing file at the
//! target path is overwritten without confirmation.

mod formats;

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use chrono::Datelike;
use rust_xlsxwriter::{DocProperties, ExcelDateTime, Url, Workbook, Worksheet};
use tracing::{debug, info};

use crate::{
    config::Config,
    errors::{TemplateError, TemplateResult},
    layout::{sheet_prefix, SheetId, FIRST_DATA_ROW, HEADER_ROW, NAV_ROW, TITLE_ROW},
    template::{Sheet, Template, Value},
};

use formats::Palette;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSummary {
    pub name: String,
    pub rows: usize,
    pub formulas: usize,
}

/// What an emit produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitReport {
    pub path: PathBuf,
    pub bytes: usize,
    pub sheets: Vec<SheetSummary>,
}

impl EmitReport {
    pub fn formulas(&self) -> usize {
        self.sheets.iter().map(|sheet| sheet.formulas).sum()
    }

    /// One-line summary suitable for CLI output.
    pub fn summary(&self) -> String {
        format!(
            "Created {} with {} sheets and {} formulas",
            self.path.display(),
            self.sheets.len(),
            self.formulas()
        )
    }
}

impl fmt::Display for EmitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary())?;
        for sheet in &self.sheets {
            writeln!(
                f,
                "  {:<16} {:>3} rows  {:>3} formulas",
                sheet.name, sheet.rows, sheet.formulas
            )?;
        }
        Ok(())
    }
}

/// Serializes the template into xlsx bytes.
pub fn emit_to_buffer(template: &Template, config: &Config) -> TemplateResult<Vec<u8>> {
    let mut workbook = build_workbook(template, config)?;
    Ok(workbook.save_to_buffer()?)
}

/// Writes the template to `path`, replacing any existing file.
pub fn emit(template: &Template, config: &Config, path: &Path) -> TemplateResult<EmitReport> {
    let bytes = emit_to_buffer(template, config)?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| TemplateError::io(parent, err))?;
    }
    fs::write(path, &bytes).map_err(|err| TemplateError::io(path, err))?;

    let report = EmitReport {
        path: path.to_path_buf(),
        bytes: bytes.len(),
        sheets: template
            .sheets()
            .iter()
            .map(|sheet| SheetSummary {
                name: sheet.name().to_string(),
                rows: sheet.rows.len(),
                formulas: sheet.formula_count(),
            })
            .collect(),
    };
    info!(
        path = %path.display(),
        bytes = report.bytes,
        formulas = report.formulas(),
        "workbook written"
    );
    Ok(report)
}

fn build_workbook(template: &Template, config: &Config) -> TemplateResult<Workbook> {
    let mut workbook = Workbook::new();
    workbook.set_properties(&document_properties(config)?);

    let palette = Palette::new(config);
    for sheet in template.sheets() {
        let worksheet = workbook.add_worksheet().set_name(sheet.name())?;
        write_sheet(worksheet, sheet, &palette, config)?;
        debug!(sheet = sheet.name(), "worksheet written");
    }
    Ok(workbook)
}

fn document_properties(config: &Config) -> TemplateResult<DocProperties> {
    let date = config.document_date;
    let year = u16::try_from(date.year()).map_err(|_| {
        TemplateError::Config(format!("document date {date} is outside the spreadsheet range"))
    })?;
    let created = ExcelDateTime::from_ymd(year, date.month() as u8, date.day() as u8)?;

    let mut properties = DocProperties::new()
        .set_title(&config.title)
        .set_creation_datetime(&created);
    if let Some(author) = &config.author {
        properties = properties.set_author(author);
    }
    Ok(properties)
}

fn write_sheet(
    worksheet: &mut Worksheet,
    sheet: &Sheet,
    palette: &Palette,
    config: &Config,
) -> TemplateResult<()> {
    let last_col = sheet.columns.len().saturating_sub(1) as u16;
    worksheet.merge_range(TITLE_ROW, 0, TITLE_ROW, last_col, &sheet.title, &palette.title)?;

    let targets = SheetId::ALL.iter().filter(|target| **target != sheet.id);
    for (col, target) in targets.enumerate() {
        let link = Url::new(format!("internal:{}A1", sheet_prefix(target.name())));
        worksheet.write_url_with_text(NAV_ROW, col as u16, link, target.name())?;
    }

    for (col, column) in sheet.columns.iter().enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(HEADER_ROW, col, &column.header, &palette.header)?;
        worksheet.set_column_width(col, column.width)?;
    }

    for row in &sheet.rows {
        for cell in &row.cells {
            let format = if cell.column == 0 {
                palette.label(cell.kind)
            } else {
                palette.value(cell.kind)
            };
            match &cell.value {
                Value::Number(value) => {
                    worksheet.write_number_with_format(row.index, cell.column, *value, format)?;
                }
                Value::Text(text) => {
                    worksheet.write_string_with_format(row.index, cell.column, text, format)?;
                }
                Value::Formula(formula) => {
                    worksheet.write_formula_with_format(
                        row.index,
                        cell.column,
                        formula.as_str(),
                        format,
                    )?;
                }
            }
        }
    }

    if config.freeze_headers {
        worksheet.set_freeze_panes(FIRST_DATA_ROW, 0)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Schema;

    fn template() -> Template {
        Template::build(&Schema::standard()).unwrap()
    }

    #[test]
    fn buffer_is_a_zip_archive() {
        let bytes = emit_to_buffer(&template(), &Config::default()).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn emit_is_deterministic() {
        let template = template();
        let config = Config::default();
        let first = emit_to_buffer(&template, &config).unwrap();
        let second = emit_to_buffer(&template, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn document_date_changes_output() {
        let template = template();
        let config = Config::default();
        let mut later = config.clone();
        later.document_date = chrono::NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        assert_ne!(
            emit_to_buffer(&template, &config).unwrap(),
            emit_to_buffer(&template, &later).unwrap()
        );
    }

    #[test]
    fn report_summary_counts_formulas() {
        let report = EmitReport {
            path: PathBuf::from("out.xlsx"),
            bytes: 10,
            sheets: vec![
                SheetSummary {
                    name: "Income".into(),
                    rows: 13,
                    formulas: 1,
                },
                SheetSummary {
                    name: "Goals".into(),
                    rows: 11,
                    formulas: 24,
                },
            ],
        };
        assert_eq!(report.summary(), "Created out.xlsx with 2 sheets and 25 formulas");
        assert!(report.to_string().contains("Goals"));
    }
}
