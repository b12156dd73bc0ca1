use crate::errors::CliError;
use crate::evaluate::GoldExample;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct GoldRecord {
    query: String,
    db_id: String,
    db_path: PathBuf,
}

/// Load gold examples from a JSON array of `{query, db_id, db_path}`
/// records, where `db_path` is the database root directory.
pub fn load_golds(path: &Path) -> Result<Vec<GoldExample>, CliError> {
    let content = read(path)?;
    let records: Vec<GoldRecord> =
        serde_json::from_str(&content).map_err(|e| CliError::DatasetLoadError {
            path: path.to_owned(),
            source: e.into(),
        })?;

    Ok(records
        .into_iter()
        .map(|record| GoldExample {
            query: record.query,
            db_id: record.db_id,
            db_root: record.db_path,
        })
        .collect())
}

/// Load prediction strings.
///
/// Accepts a JSON array of SQL strings, a JSON object mapping example
/// indices to SQL strings (keys sorted numerically), or plain text with one
/// query per line where only the text before the first tab is kept.
pub fn load_predictions(path: &Path) -> Result<Vec<String>, CliError> {
    let content = read(path)?;

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(&content) {
        return predictions_from_json(path, value);
    }

    Ok(content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.split('\t').next().unwrap_or(line).trim().to_string())
        .collect())
}

fn predictions_from_json(
    path: &Path,
    value: serde_json::Value,
) -> Result<Vec<String>, CliError> {
    let format_error = || CliError::PredictionFormat {
        path: path.to_owned(),
    };

    match value {
        serde_json::Value::Array(entries) => entries
            .into_iter()
            .map(|entry| match entry {
                serde_json::Value::String(sql) => Ok(sql),
                _ => Err(format_error()),
            })
            .collect(),
        serde_json::Value::Object(map) => {
            let mut entries = Vec::with_capacity(map.len());
            for (key, entry) in map {
                let index: usize = key.trim().parse().map_err(|_| format_error())?;
                match entry {
                    serde_json::Value::String(sql) => entries.push((index, sql)),
                    _ => return Err(format_error()),
                }
            }
            entries.sort_by_key(|(index, _)| *index);
            Ok(entries.into_iter().map(|(_, sql)| sql).collect())
        }
        _ => Err(format_error()),
    }
}

fn read(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|e| CliError::DatasetLoadError {
        path: path.to_owned(),
        source: e.into(),
    })
}
