use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
        OutputFormat::Header => render_headers(&serde_json::to_value(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

/// One line per non-null field, sorted by key.
fn render_headers(value: &Value) -> anyhow::Result<String> {
    let Value::Object(map) = value else {
        anyhow::bail!("header output needs an object response");
    };

    let mut entries = map
        .iter()
        .filter(|(_, value)| !value.is_null())
        .collect::<Vec<_>>();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let lines = entries
        .into_iter()
        .map(|(key, value)| format!("{}: {}", header_name(key), header_value(value)))
        .collect::<Vec<_>>();
    Ok(lines.join("\n"))
}

/// `cache_path` -> `Cache-Path`.
fn header_name(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect::<String>()
            })
        })
        .collect::<Vec<_>>()
        .join("-")
}

fn header_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
