#![doc(test(attr(deny(warnings))))]

//! Finance Template generates a personal-finance workbook (dashboard, income,
//! expenses, assets, liabilities, goals, calculations and cash-flow sheets)
//! from a declarative layout schema. Every cross-sheet formula is derived
//! from that schema, so totals and references cannot drift apart.

pub mod cli;
pub mod config;
pub mod emitter;
pub mod errors;
pub mod formula;
pub mod layout;
pub mod template;
pub mod utils;

use std::path::Path;

pub use config::{Config, ConfigManager};
pub use emitter::{emit, emit_to_buffer, EmitReport};
pub use errors::{TemplateError, TemplateResult};
pub use layout::{Schema, SheetId};
pub use template::Template;

/// Initializes global tracing. Safe to call more than once.
pub fn init() {
    utils::init_tracing();
}

/// Builds the standard template and writes it to `path`.
pub fn generate(config: &Config, path: &Path) -> TemplateResult<EmitReport> {
    let template = Template::build(&Schema::standard())?;
    emit(&template, config, path)
}
