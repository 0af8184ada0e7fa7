//! CSV loader for batch comparison scenarios.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter. Values are
//! validated exactly like the command-line flags.
//!
//! | Column | Required | Notes |
//! |------------------|----------|--------------------------------------------|
//! | `area` | yes | e.g. `Desenvolvimento de Software` |
//! | `seniority` | yes | `Júnior`, `Pleno`, `Sênior` |
//! | `location` | yes | e.g. `São Paulo - SP` |
//! | `gross_salary` | yes | CLT monthly gross, > 0 |
//! | `gross_revenue` | yes | PJ monthly revenue, > 0 |
//! | `extra_benefits` | no | already-net monthly benefits |
//! | `costs` | no | PJ monthly costs |
//! | `tax_rate` | no | `0.12` or `12%`; empty lets the engine pick |
//! | `perspective` | no | `clt` (default) or `pj` |
//!
//! ### Example
//!
//! ```csv
//! area,seniority,location,gross_salary,gross_revenue,costs,perspective
//! Desenvolvimento de Software,Pleno,São Paulo - SP,8000.00,20000.00,,clt
//! Marketing Digital,Júnior,Rio de Janeiro - RJ,3500.00,5000.00,300.00,pj
//! ```

use std::path::Path;

use cltpj_core::{EvaluationRequest, RawEvaluationInput, ValidationError};

/// Errors that can occur while loading scenario files.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioLoadError {
    /// The CSV is structurally invalid.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A row failed validation. `row` is 1-based (header = row 0).
    #[error("invalid scenario on row {row}: {source}")]
    Invalid {
        row: usize,
        #[source]
        source: ValidationError,
    },

    #[error("cannot read scenario file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Parse CSV text and validate every row. Rows are returned in file order.
pub fn load_from_str(input: &str) -> Result<Vec<EvaluationRequest>, ScenarioLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<RawEvaluationInput>()
        .enumerate()
        .map(|(idx, result)| {
            let raw = result?;
            raw.validate()
                .map_err(|source| ScenarioLoadError::Invalid {
                    row: idx + 1,
                    source,
                })
        })
        .collect()
}

/// Read a file from disk and delegate to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<Vec<EvaluationRequest>, ScenarioLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ScenarioLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_from_str(&contents)
}
