//! Command-line front end for the template generator.

pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::{
    config::{Config, ConfigManager},
    errors::{TemplateError, TemplateResult},
    layout::{column_letters, Schema, SheetBody, SheetLayout},
    utils::build_info,
};

use output::OutputPreferences;

#[derive(Debug, Parser)]
#[command(
    name = "finance_template_cli",
    about = "Generate a personal finance workbook template"
)]
pub struct Cli {
    /// Config file; defaults to the platform config directory when present.
    #[arg(long, short = 'c', env = "FINANCE_TEMPLATE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output path, overriding the config.
    #[arg(long, short = 'o', global = true)]
    pub output: Option<PathBuf>,

    /// Suppress the summary on success.
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub plain: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Write the workbook (the default when no command is given).
    Generate,
    /// Print where each sheet's categories and totals live.
    Layout,
    /// Write a config file populated with defaults.
    InitConfig {
        path: PathBuf,
        /// Replace an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Print build metadata.
    Version,
}

/// Parses process arguments and runs the selected command.
pub fn run_cli() -> TemplateResult<()> {
    run(Cli::parse())
}

pub fn run(cli: Cli) -> TemplateResult<()> {
    output::set_preferences(OutputPreferences {
        quiet_mode: cli.quiet,
        plain_output: cli.plain,
    });

    match cli.command.clone().unwrap_or(Command::Generate) {
        Command::Generate => generate(&cli),
        Command::Layout => {
            print_layout(&Schema::standard());
            Ok(())
        }
        Command::InitConfig { path, force } => init_config(path, force),
        Command::Version => {
            println!("{}", build_info::current().report());
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> TemplateResult<Config> {
    if let Some(path) = &cli.config {
        debug!(path = %path.display(), "loading config");
        return ConfigManager::new(path).load_existing();
    }
    match ConfigManager::from_default_location() {
        Some(manager) if manager.exists() => {
            debug!(path = %manager.config_path().display(), "loading default config");
            manager.load_existing()
        }
        _ => Ok(Config::default()),
    }
}

fn generate(cli: &Cli) -> TemplateResult<()> {
    let config = load_config(cli)?;
    let path = cli
        .output
        .clone()
        .unwrap_or_else(|| config.output_path.clone());
    let report = crate::generate(&config, &path)?;

    output::success(report.summary());
    for sheet in &report.sheets {
        output::info(format!(
            "  {:<16} {:>3} rows  {:>3} formulas",
            sheet.name, sheet.rows, sheet.formulas
        ));
    }
    Ok(())
}

fn init_config(path: PathBuf, force: bool) -> TemplateResult<()> {
    let manager = ConfigManager::new(path);
    if manager.exists() {
        if !force {
            return Err(TemplateError::Config(format!(
                "{} already exists; pass --force to replace it",
                manager.config_path().display()
            )));
        }
        output::warning(format!(
            "Replacing {}",
            manager.config_path().display()
        ));
    }
    manager.save(&Config::default())?;
    output::success(format!(
        "Wrote default config to {}",
        manager.config_path().display()
    ));
    Ok(())
}

fn print_layout(schema: &Schema) {
    output::section("Layout");
    for sheet in schema.sheets() {
        output::info(layout_line(sheet));
    }
}

pub(crate) fn layout_line(sheet: &SheetLayout) -> String {
    match (&sheet.body, sheet.category_rows()) {
        (SheetBody::Categories { .. }, Some(rows)) => {
            let totals: Vec<String> = (0..sheet.columns.len() as u16)
                .filter_map(|col| sheet.total_cell(col))
                .map(|cell| cell.to_string())
                .collect();
            format!(
                "{:<16} {} categories in rows {}-{}, totals {}",
                sheet.name(),
                rows.count(),
                rows.first + 1,
                rows.last + 1,
                totals.join(", ")
            )
        }
        (SheetBody::Entries(entries), _) => format!(
            "{:<16} {} entries in column {}",
            sheet.name(),
            entries.len(),
            column_letters(crate::layout::VALUE_COLUMN)
        ),
        (SheetBody::Categories { .. }, None) => format!("{:<16} no categories", sheet.name()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::SheetId;

    #[test]
    fn layout_line_lists_totals() {
        let schema = Schema::standard();
        let line = layout_line(schema.sheet(SheetId::Liabilities).unwrap());
        assert_eq!(
            line,
            "Liabilities      12 categories in rows 5-16, totals B17, D17"
        );
    }

    #[test]
    fn layout_line_for_entries() {
        let schema = Schema::standard();
        let line = layout_line(schema.sheet(SheetId::Dashboard).unwrap());
        assert_eq!(line, "Dashboard        16 entries in column B");
    }

    #[test]
    fn missing_command_defaults_to_generate() {
        let cli = Cli::try_parse_from(["finance_template_cli", "--output", "x.xlsx"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.output, Some(PathBuf::from("x.xlsx")));
    }

    #[test]
    fn init_config_parses_force() {
        let cli =
            Cli::try_parse_from(["finance_template_cli", "init-config", "cfg.json", "--force"])
                .unwrap();
        match cli.command {
            Some(Command::InitConfig { path, force }) => {
                assert_eq!(path, PathBuf::from("cfg.json"));
                assert!(force);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
