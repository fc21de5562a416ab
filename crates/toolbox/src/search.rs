//! Search tools for web and document lookups.
//!
//! Both are placeholders; the result text is fixed apart from the echoed
//! query.

use runtime::tools::{Arguments, Tool, ToolError, parse_arguments};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

/// Searches the internet for current information.
#[derive(Debug, Default)]
pub struct SearchWeb;

impl Tool for SearchWeb {
    fn name(&self) -> &str {
        "search_web"
    }

    fn description(&self) -> &str {
        "Search the internet for current information, news, and web content. \
         Use this for recent events, frequently changing facts, or anything past \
         the model's knowledge cutoff."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query string. Specific keywords give better results."
                },
                "max_results": {
                    "type": "integer",
                    "description": "Maximum number of results to return (1-10, default: 5)"
                }
            },
            "required": ["query"]
        })
    }

    fn invoke(&self, arguments: &Arguments) -> Result<Value, ToolError> {
        #[derive(Deserialize)]
        struct Params {
            query: String,
            #[serde(default = "default_max_results")]
            max_results: u32,
        }

        let params: Params = parse_arguments(arguments)?;
        info!(query = %params.query, max_results = params.max_results, "Tool called: search_web");

        Ok(Value::String(format!(
            "Search results for '{}':\n1. Result placeholder 1\n2. Result placeholder 2",
            params.query
        )))
    }
}

fn default_max_results() -> u32 {
    5
}

/// Searches internal document collections.
#[derive(Debug, Default)]
pub struct SearchDocuments;

impl Tool for SearchDocuments {
    fn name(&self) -> &str {
        "search_documents"
    }

    fn description(&self) -> &str {
        "Search internal document repositories and knowledge bases for policies, \
         procedures, product documentation, or other uploaded documents."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Natural language search query"
                },
                "collection": {
                    "type": "string",
                    "description": "Document collection to search (default: \"default\")"
                }
            },
            "required": ["query"]
        })
    }

    fn invoke(&self, arguments: &Arguments) -> Result<Value, ToolError> {
        #[derive(Deserialize)]
        struct Params {
            query: String,
            collection: Option<String>,
        }

        let params: Params = parse_arguments(arguments)?;
        let collection = params.collection.as_deref().unwrap_or("default");
        info!(query = %params.query, collection, "Tool called: search_documents");

        Ok(Value::String(format!(
            "Document search results from '{collection}' collection for '{}':\n\
             No documents found (placeholder).",
            params.query
        )))
    }
}
