use serde_json::{json, Map, Value};
use std::io::{self, BufRead, Write};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(data_value) = data {
                response["data"] = data_value;
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output a record as pretty JSON regardless of format
pub fn output_record(record: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(record)?);
    Ok(())
}

/// Ask for confirmation on stdin; anything but y/yes declines
pub fn confirm(question: &str) -> anyhow::Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Parse `key=value` for clap
pub fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim().to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{}'", raw)),
    }
}

/// Merge `--set` (string) and `--set-json` (raw JSON) assignments into form values
pub fn collect_values(
    strings: Vec<(String, String)>,
    raw_json: Vec<(String, String)>,
) -> anyhow::Result<Map<String, Value>> {
    let mut values = Map::new();
    for (key, value) in strings {
        values.insert(key, Value::String(value));
    }
    for (key, value) in raw_json {
        let parsed: Value = serde_json::from_str(&value)
            .map_err(|e| anyhow::anyhow!("--set-json {}: invalid JSON: {}", key, e))?;
        values.insert(key, parsed);
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignments_split_on_first_equals() {
        assert_eq!(
            parse_assignment("imageUrl=https://x/y?a=b").unwrap(),
            ("imageUrl".to_string(), "https://x/y?a=b".to_string())
        );
        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("=x").is_err());
    }

    #[test]
    fn json_assignments_keep_their_type() {
        let values = collect_values(
            vec![("name".into(), "123".into())],
            vec![("price".into(), "12.5".into()), ("images".into(), r#"[{"url":"u"}]"#.into())],
        )
        .unwrap();
        assert_eq!(values["name"], json!("123"));
        assert_eq!(values["price"], json!(12.5));
        assert_eq!(values["images"][0]["url"], json!("u"));

        assert!(collect_values(vec![], vec![("price".into(), "{".into())]).is_err());
    }
}
