use std::path::PathBuf;
use thiserror::Error;

/// Failures while reading an emissions table.
///
/// Malformed numeric cells are not errors (they load as missing values);
/// only structural problems with the file are reported here.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required column `{0}`")]
    MissingColumn(&'static str),
    #[error("no year columns (expected 4-digit headers such as 2010)")]
    NoYearColumns,
}
