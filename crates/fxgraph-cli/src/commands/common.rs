//! Shared CLI helpers used across multiple commands.

use std::io::Read;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use fxgraph_contract::{GraphPayload, deserialize_str};

/// Reads a file, or stdin when `path` is `-`.
pub fn read_text(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path.display()))
}

/// Reads and decodes a graph payload.
pub fn read_payload(path: &Path) -> anyhow::Result<GraphPayload> {
    let text = read_text(path)?;
    deserialize_str(&text).map_err(|e| anyhow::anyhow!("{}: {e}", path.display()))
}

/// Writes `text` to a file, or stdout when `path` is `None`.
pub fn write_text(path: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => std::fs::write(path, format!("{text}\n"))
            .with_context(|| format!("failed to write '{}'", path.display())),
        None => {
            println!("{text}");
            Ok(())
        }
    }
}

/// Pretty-prints a compact contract document.
pub fn pretty(json: &str) -> anyhow::Result<String> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_keeps_content() {
        let out = pretty(r#"{"a":1,"b":[true]}"#).unwrap();
        assert!(out.contains("\"a\": 1"));
        assert!(out.lines().count() > 1);
    }

    #[test]
    fn clock_is_after_2020() {
        assert!(now_millis() > 1_577_836_800_000);
    }
}
