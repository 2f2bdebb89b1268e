//! Model Context Protocol over stdio: newline-delimited JSON-RPC 2.0.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::tools::ToolHandler;

const SERVER_NAME: &str = "S3 MCP Server";
const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

const PARSE_ERROR: i64 = -32700;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;

#[derive(Debug, Deserialize)]
struct Request {
    #[serde(default)]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Debug, Serialize)]
struct Response {
    jsonrpc: &'static str,
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
}

#[derive(Debug, Serialize)]
struct RpcError {
    code: i64,
    message: String,
}

impl Response {
    fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

/// Serve requests read from `reader` until end of input.
pub async fn serve<R, W>(handler: &ToolHandler, reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await.context("Failed to read request")? {
        if line.trim().is_empty() {
            continue;
        }

        if let Some(response) = handle_message(handler, &line).await {
            let mut frame = serde_json::to_vec(&response).context("Failed to encode response")?;
            frame.push(b'\n');
            writer.write_all(&frame).await.context("Failed to write response")?;
            writer.flush().await.context("Failed to flush response")?;
        }
    }

    log::info!("Input closed, shutting down");
    Ok(())
}

async fn handle_message(handler: &ToolHandler, line: &str) -> Option<Response> {
    let request: Request = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            log::warn!("Unparsable message: {}", e);
            return Some(Response::failure(Value::Null, PARSE_ERROR, format!("Parse error: {}", e)));
        }
    };

    // Notifications get no response.
    let id = request.id?;

    let response = match request.method.as_str() {
        "initialize" => Response::success(id, initialize_result(&request.params)),
        "ping" => Response::success(id, json!({})),
        "tools/list" => Response::success(id, json!({ "tools": tool_definitions() })),
        "tools/call" => match call_tool(handler, &request.params).await {
            Ok(result) => Response::success(id, result),
            Err(message) => Response::failure(id, INVALID_PARAMS, message),
        },
        other => {
            log::debug!("Unknown method '{}'", other);
            Response::failure(id, METHOD_NOT_FOUND, format!("Method not found: {}", other))
        }
    };

    Some(response)
}

fn initialize_result(params: &Value) -> Value {
    let protocol_version = params
        .get("protocolVersion")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_PROTOCOL_VERSION);

    json!({
        "protocolVersion": protocol_version,
        "capabilities": { "tools": { "listChanged": false } },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION"),
        },
        "instructions": "MCP Server for accessing S3 bucket",
    })
}

fn tool_definitions() -> Value {
    json!([
        {
            "name": "get_object",
            "description": "Fetch an object from the bucket and return its metadata and text (PDF and PowerPoint content is extracted)",
            "inputSchema": {
                "type": "object",
                "properties": { "key": { "type": "string" } },
                "required": ["key"],
            },
        },
        {
            "name": "list_buckets",
            "description": "List object keys in the bucket under a prefix",
            "inputSchema": {
                "type": "object",
                "properties": { "prefix": { "type": "string" } },
                "required": ["prefix"],
            },
        },
    ])
}

/// Run a tool. `Err` is a protocol-level error (bad name or arguments);
/// failures of the tool itself are reported in the result with `isError`.
async fn call_tool(handler: &ToolHandler, params: &Value) -> std::result::Result<Value, String> {
    let name = params
        .get("name")
        .and_then(Value::as_str)
        .ok_or("Missing tool name")?;
    let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

    match name {
        "get_object" => {
            let key = string_argument(&arguments, "key")?;
            log::info!("get_object '{}'", key);
            let result = match handler.get_object(key).await {
                Ok(outcome) => serde_json::to_string(&outcome)
                    .map(|text| text_result(vec![text]))
                    .unwrap_or_else(|e| error_result(&anyhow::Error::from(e))),
                Err(e) => error_result(&e),
            };
            Ok(result)
        }
        "list_buckets" => {
            let prefix = string_argument(&arguments, "prefix")?;
            log::info!("list_buckets '{}'", prefix);
            let result = match handler.list_buckets(prefix).await {
                Ok(objects) => text_result(objects.into_iter().map(|o| o.key).collect()),
                Err(e) => error_result(&e),
            };
            Ok(result)
        }
        other => Err(format!("Unknown tool: {}", other)),
    }
}

fn string_argument<'a>(arguments: &'a Value, name: &str) -> std::result::Result<&'a str, String> {
    arguments
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| format!("Invalid arguments: '{}' must be a string", name))
}

fn text_result(texts: Vec<String>) -> Value {
    let content: Vec<Value> = texts
        .into_iter()
        .map(|text| json!({ "type": "text", "text": text }))
        .collect();
    json!({ "content": content })
}

fn error_result(error: &anyhow::Error) -> Value {
    log::error!("Tool call failed: {:#}", error);
    json!({
        "content": [{ "type": "text", "text": format!("{:#}", error) }],
        "isError": true,
    })
}
