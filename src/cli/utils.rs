use serde_json::{json, Map, Value};

use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::Database;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = Map::new();
            response.insert("success".into(), json!(true));
            response.insert("message".into(), json!(message));
            if let Some(data) = data {
                response.insert("data".into(), data);
            }
            println!("{}", serde_json::to_string_pretty(&Value::Object(response))?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "success": false,
                    "error": message
                }))?
            );
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Environment config plus an open connection, as every command needs both.
pub async fn connect() -> anyhow::Result<(AppConfig, Database)> {
    let _ = dotenvy::dotenv();
    let config = AppConfig::from_env()?;
    let database = Database::connect(&config.database).await?;
    Ok((config, database))
}
