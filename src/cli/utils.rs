use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(output_format: OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(response)) = (data, response.as_object_mut()) {
                response.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output a list of rows as a JSON collection or aligned text
pub fn output_table(output_format: OutputFormat, collection_name: &str, rows: &[(&str, String)]) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let items: Vec<Value> = rows
                .iter()
                .map(|(name, detail)| json!({ "name": name, "detail": detail }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&json!({ collection_name: items }))?);
        }
        OutputFormat::Text => {
            let width = rows.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
            for (name, detail) in rows {
                println!("{:width$}  {}", name, detail, width = width);
            }
        }
    }
    Ok(())
}
