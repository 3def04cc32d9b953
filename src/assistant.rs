//! Turns the filtered view and a question into a completion request.

use crate::error::{Result, WizardError};
use crate::llm::{ChatMessage, CompletionService};
use crate::prompts::{user_message, NO_DATA_PLACEHOLDER, SYSTEM_INSTRUCTION};
use crate::table::Table;
use polars::prelude::*;
use tracing::info;

/// Dataset context for the user message: the rows as a JSON array of
/// records, or the placeholder text when there are none.
pub fn build_context(view: Option<&Table>) -> Result<String> {
    match view.and_then(Table::frame) {
        None => Ok(NO_DATA_PLACEHOLDER.to_string()),
        Some(df) => records_json(df),
    }
}

/// Serialize `df` as `[{"column": value, ...}, ...]`, columns in frame order.
pub fn records_json(df: &DataFrame) -> Result<String> {
    let mut buf = Vec::new();
    let mut df = df.clone();
    JsonWriter::new(&mut buf)
        .with_json_format(JsonFormat::Json)
        .finish(&mut df)?;
    String::from_utf8(buf)
        .map_err(|e| WizardError::Llm(format!("Dataset serialization is not UTF-8: {}", e)))
}

/// System instruction followed by the dataset and the question.
pub fn build_messages(view: Option<&Table>, question: &str) -> Result<Vec<ChatMessage>> {
    let context = build_context(view)?;
    Ok(vec![
        ChatMessage::system(SYSTEM_INSTRUCTION),
        ChatMessage::user(user_message(&context, question)),
    ])
}

/// One question, one completion call. No retry.
pub async fn ask<S>(service: &S, view: Option<&Table>, question: &str) -> Result<String>
where
    S: CompletionService + ?Sized,
{
    let messages = build_messages(view, question)?;
    info!(
        "Asking about {} rows",
        view.map(Table::height).unwrap_or_default()
    );
    service.complete(&messages).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_when_nothing_selected() {
        assert_eq!(build_context(None).unwrap(), NO_DATA_PLACEHOLDER);

        let empty = Table::empty_with_schema(&["Country", "Company"]);
        assert_eq!(build_context(Some(&empty)).unwrap(), NO_DATA_PLACEHOLDER);
    }

    #[test]
    fn test_records_keep_rows_and_fields() {
        let table = Table::from_frame(
            df![
                "Country" => ["US", "UK"],
                "Company" => ["Acme", "Globex"],
                "Year_2023" => ["Y", "N"]
            ]
            .unwrap(),
        );

        let context = build_context(Some(&table)).unwrap();
        let records: Vec<serde_json::Map<String, serde_json::Value>> =
            serde_json::from_str(&context).unwrap();

        assert_eq!(records.len(), 2);
        for record in &records {
            let mut keys: Vec<&str> = record.keys().map(String::as_str).collect();
            keys.sort();
            assert_eq!(keys, vec!["Company", "Country", "Year_2023"]);
        }
        assert_eq!(records[1]["Company"], "Globex");
        assert_eq!(records[0]["Year_2023"], "Y");
    }

    #[test]
    fn test_message_layout() {
        let messages = build_messages(None, "Is the ARPU data available for 2023?").unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[0].content, SYSTEM_INSTRUCTION);
        assert_eq!(messages[1].role, "user");
        assert_eq!(
            messages[1].content,
            format!(
                "Dataset:\n{}\n\nUser query: Is the ARPU data available for 2023?",
                NO_DATA_PLACEHOLDER
            )
        );
    }
}
