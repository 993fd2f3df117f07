use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Tsv,
    Csv,
    Json,
}

/// 把 `data` 轉成試算表儲存格：純量一格、陣列一欄、二維陣列多列
pub fn to_grid(value: &Value) -> Vec<Vec<String>> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) if items.iter().all(Value::is_array) => items
            .iter()
            .map(|row| match row {
                Value::Array(cells) => cells.iter().map(cell_text).collect(),
                other => vec![cell_text(other)],
            })
            .collect(),
        Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_object) => {
            object_rows(items)
        }
        Value::Array(items) => items.iter().map(|item| vec![cell_text(item)]).collect(),
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| vec![key.clone(), cell_text(value)])
            .collect(),
        scalar => vec![vec![cell_text(scalar)]],
    }
}

fn object_rows(items: &[Value]) -> Vec<Vec<String>> {
    let header: Vec<String> = match items.first() {
        Some(Value::Object(first)) => first.keys().cloned().collect(),
        _ => return Vec::new(),
    };

    let mut rows = Vec::with_capacity(items.len() + 1);
    rows.push(header.clone());
    for item in items {
        rows.push(
            header
                .iter()
                .map(|key| item.get(key).map(cell_text).unwrap_or_default())
                .collect(),
        );
    }
    rows
}

pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        composite => composite.to_string(),
    }
}

pub fn write_value<W: Write>(value: &Value, format: OutputFormat, mut writer: W) -> Result<()> {
    let delimiter = match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, value)?;
            writeln!(writer)?;
            return Ok(());
        }
        OutputFormat::Tsv => b'\t',
        OutputFormat::Csv => b',',
    };

    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_writer(writer);
    for row in to_grid(value) {
        csv_writer.write_record(&row)?;
    }
    csv_writer.flush()?;
    Ok(())
}
