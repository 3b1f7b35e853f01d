use crate::core::database::{Database, DatabaseBuilder};
use crate::domain::model::{BrowscapVersion, Properties};
use crate::domain::ports::Storage;
use crate::utils::error::{BrowscapError, Result};
use std::io::Read;

pub const CSV_FILE: &str = "browscap.csv";

/// Row that carries browscap defaults rather than a user-agent pattern.
const DEFAULT_PROPERTIES: &str = "DefaultProperties";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertSummary {
    pub patterns: usize,
    pub duplicates: usize,
}

/// Reads browscap.csv from `storage` and writes the pattern cache next to it.
pub async fn convert<S: Storage>(storage: &S) -> Result<ConvertSummary> {
    if !storage.exists(CSV_FILE).await {
        tracing::error!("browscap.csv not found. Did you run fetch?");
        return Err(BrowscapError::CsvNotFound {
            path: storage.location(CSV_FILE),
        });
    }

    let data = storage.read_file(CSV_FILE).await?;
    tracing::info!("Parsing {} ({} bytes)", storage.location(CSV_FILE), data.len());
    let (database, summary) = parse_browscap_csv(data.as_slice())?;

    if let Some(version) = &database.version {
        tracing::info!("Browscap version {} released {}", version.version, version.released);
    }
    database.save(storage).await?;
    tracing::info!(
        "Converted {} patterns ({} duplicates skipped)",
        summary.patterns,
        summary.duplicates
    );
    Ok(summary)
}

/// Parses the browscap.csv layout: a version header line, a version line,
/// the column names, then one row per pattern.
pub fn parse_browscap_csv<R: Read>(reader: R) -> Result<(Database, ConvertSummary)> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut records = csv_reader.records();

    let mut next_header = |what: &str| -> Result<csv::StringRecord> {
        records
            .next()
            .transpose()?
            .ok_or_else(|| BrowscapError::InvalidCsv {
                record: 0,
                message: format!("missing {}", what),
            })
    };

    let _version_names = next_header("version header")?;
    let version_values = next_header("version line")?;
    let columns = next_header("column names")?;

    let version = match (version_values.get(0), version_values.get(1)) {
        (Some(version), Some(released)) => Some(BrowscapVersion {
            version: version.to_string(),
            released: released.to_string(),
        }),
        _ => None,
    };

    let mut builder = DatabaseBuilder::new();
    for record in records {
        let record = record?;
        let properties = Properties::from_row(columns.iter(), record.iter());
        if properties.pattern() == Some(DEFAULT_PROPERTIES) {
            continue;
        }

        match builder.add(properties) {
            Ok(()) => {}
            Err(BrowscapError::DuplicatePattern { pattern }) => {
                tracing::warn!("Skipping duplicate pattern {}", pattern);
            }
            Err(BrowscapError::InvalidCsv { message, .. }) => {
                return Err(BrowscapError::InvalidCsv {
                    record: record.position().map_or(0, |p| p.record()),
                    message,
                });
            }
            Err(e) => return Err(e),
        }
    }

    let summary = ConvertSummary {
        patterns: builder.len(),
        duplicates: builder.duplicates(),
    };
    Ok((builder.finish(version), summary))
}
