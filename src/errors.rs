use std::path::PathBuf;

use thiserror::Error;

/// Error type covering every failure the generator can hit.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// A formula or layout entry points at something the schema does not define.
    #[error("Schema inconsistency: {0}")]
    SchemaInconsistency(String),
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Workbook serialization error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TemplateError {
    pub(crate) fn schema(message: impl Into<String>) -> Self {
        TemplateError::SchemaInconsistency(message.into())
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TemplateError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type TemplateResult<T> = Result<T, TemplateError>;
