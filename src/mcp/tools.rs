use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use tracing::debug;

use crate::mcp::protocol::JsonRpcError;
use crate::mcp::types::{Tool, ToolCall, ToolResult};
use crate::storage::ExpenseRepository;

/// Arguments for the add_expense tool. Optional members accept an absent
/// key or an explicit null; both resolve to the same empty-string default
/// at the create boundary.
#[derive(Debug, Deserialize)]
pub struct AddExpenseArgs {
    pub date: String,
    pub amount: f64,
    pub category: String,
    pub subcategory: Option<String>,
    pub note: Option<String>,
}

/// Arguments for the list_expenses tool.
#[derive(Debug, Deserialize)]
pub struct ListExpensesArgs {
    pub start_date: String,
    pub end_date: String,
}

/// Arguments for the summarize tool.
#[derive(Debug, Deserialize)]
pub struct SummarizeArgs {
    pub start_date: String,
    pub end_date: String,
    pub category: Option<String>,
}

/// The expense tool surface: catalog plus dispatch into the repository.
pub struct ExpenseTools {
    repository: ExpenseRepository,
}

impl ExpenseTools {
    pub fn new(repository: ExpenseRepository) -> Self {
        Self { repository }
    }

    /// Tool definitions advertised on tools/list.
    pub fn catalog() -> Vec<Tool> {
        vec![
            Tool {
                name: "add_expense".to_string(),
                description: "Add a new expense entry to the database.".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "date": { "type": "string", "description": "Expense date as YYYY-MM-DD" },
                        "amount": { "type": "number" },
                        "category": { "type": "string" },
                        "subcategory": { "type": "string" },
                        "note": { "type": "string" }
                    },
                    "required": ["date", "amount", "category"]
                }),
            },
            Tool {
                name: "list_expenses".to_string(),
                description: "List expense entries within an inclusive date range.".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "start_date": { "type": "string", "description": "Range start as YYYY-MM-DD, inclusive" },
                        "end_date": { "type": "string", "description": "Range end as YYYY-MM-DD, inclusive" }
                    },
                    "required": ["start_date", "end_date"]
                }),
            },
            Tool {
                name: "summarize".to_string(),
                description: "Summarize expenses by category within an inclusive date range."
                    .to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "start_date": { "type": "string", "description": "Range start as YYYY-MM-DD, inclusive" },
                        "end_date": { "type": "string", "description": "Range end as YYYY-MM-DD, inclusive" },
                        "category": { "type": "string", "description": "Restrict the summary to one category (exact match)" }
                    },
                    "required": ["start_date", "end_date"]
                }),
            },
        ]
    }

    /// Execute a tool call.
    ///
    /// Malformed arguments and unknown tool names are protocol errors;
    /// storage failures surface as tool results flagged with isError so the
    /// caller sees what went wrong.
    pub async fn call(&self, call: &ToolCall) -> Result<ToolResult, JsonRpcError> {
        debug!("Dispatching tool call: {}", call.name);

        let arguments = call.arguments.clone().unwrap_or(JsonValue::Null);

        match call.name.as_str() {
            "add_expense" => {
                let args: AddExpenseArgs = parse_arguments(arguments)?;
                match self
                    .repository
                    .add(
                        &args.date,
                        args.amount,
                        &args.category,
                        args.subcategory.as_deref(),
                        args.note.as_deref(),
                    )
                    .await
                {
                    Ok(id) => Ok(result_from_value(&json!({ "status": "ok", "id": id }))),
                    Err(e) => Ok(ToolResult::error(e.to_string())),
                }
            }
            "list_expenses" => {
                let args: ListExpensesArgs = parse_arguments(arguments)?;
                match self
                    .repository
                    .list_by_date_range(&args.start_date, &args.end_date)
                    .await
                {
                    Ok(expenses) => Ok(result_from_value(&json!(expenses))),
                    Err(e) => Ok(ToolResult::error(e.to_string())),
                }
            }
            "summarize" => {
                let args: SummarizeArgs = parse_arguments(arguments)?;
                match self
                    .repository
                    .summarize(&args.start_date, &args.end_date, args.category.as_deref())
                    .await
                {
                    Ok(totals) => Ok(result_from_value(&json!(totals))),
                    Err(e) => Ok(ToolResult::error(e.to_string())),
                }
            }
            other => Err(JsonRpcError::invalid_params(&format!(
                "Unknown tool: {}",
                other
            ))),
        }
    }
}

fn parse_arguments<T: serde::de::DeserializeOwned>(
    arguments: JsonValue,
) -> Result<T, JsonRpcError> {
    serde_json::from_value(arguments).map_err(|e| JsonRpcError::invalid_params(&e.to_string()))
}

fn result_from_value(value: &JsonValue) -> ToolResult {
    ToolResult::text(value.to_string())
}
