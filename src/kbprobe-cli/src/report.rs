use clap::ValueEnum;
use kbprobe_core::{CollectionInfo, Record};
use serde::Serialize;
use std::fmt::Write;

const MAX_VALUE_CHARS: usize = 100;

/// Output format for inspection reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Serialize)]
struct SampleReport<'a> {
    collection: &'a str,
    fields: &'a [String],
    records: &'a [Record],
}

pub fn render_collections(
    infos: &[CollectionInfo],
    format: ReportFormat,
) -> anyhow::Result<String> {
    match format {
        ReportFormat::Json => Ok(serde_json::to_string_pretty(infos)?),
        ReportFormat::Text => {
            let mut out = String::new();
            if infos.is_empty() {
                out.push_str("No collections found\n");
                return Ok(out);
            }
            writeln!(out, "{} collection(s):", infos.len())?;
            for info in infos {
                writeln!(
                    out,
                    "  {}  size={} distance={} points={}",
                    info.name, info.vectors.size, info.vectors.distance, info.points_count
                )?;
            }
            Ok(out)
        }
    }
}

pub fn render_sample(
    collection: &str,
    fields: &[String],
    records: &[Record],
    format: ReportFormat,
) -> anyhow::Result<String> {
    match format {
        ReportFormat::Json => Ok(serde_json::to_string_pretty(&SampleReport {
            collection,
            fields,
            records,
        })?),
        ReportFormat::Text => {
            let mut out = String::new();
            writeln!(out, "Collection '{}': {} record(s) sampled", collection, records.len())?;
            writeln!(out, "Payload fields: {}", fields.join(", "))?;
            for (i, record) in records.iter().enumerate() {
                writeln!(out, "\n[{}] id={}", i + 1, record.id)?;
                for (key, value) in &record.payload {
                    writeln!(out, "    {}: {}", key, display_value(value))?;
                }
            }
            Ok(out)
        }
    }
}

/// Strings are shown unquoted and truncated; everything else as compact JSON
fn display_value(value: &serde_json::Value) -> String {
    let text = match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    if text.chars().count() > MAX_VALUE_CHARS {
        let cut: String = text.chars().take(MAX_VALUE_CHARS).collect();
        format!("{}...", cut)
    } else {
        text
    }
}
