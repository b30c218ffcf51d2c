//! ISQ MCP Server
//!
//! Line-delimited JSON-RPC 2.0 on stdio. Every function of the units library
//! is exposed as a tool of the same name, plus:
//! - help: Get documentation for a function, or the function list
//! - list_functions: List available functions, optionally by category
//!
//! With `ISQ_TRACE` set, every tool result also carries the plugin calls
//! made to produce it under `trace`.

mod config;

use std::io::{self, BufRead, Write};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use isq_core::IsqError;
use isq_plugin::{ArgMeta, EvalContext, FunctionMeta, PluginRegistry};
use config::{ServerConfig, DEFAULT_LOG_FILTER};

const PROTOCOL_VERSION: &str = "2025-11-25";
const SERVER_NAME: &str = "isq";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

// MCP Protocol types
#[derive(Debug, Deserialize)]
struct McpRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    id: Option<JsonValue>,
    method: String,
    #[serde(default)]
    params: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
struct McpResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<McpError>,
}

#[derive(Debug, Serialize)]
struct McpError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<JsonValue>,
}

impl McpError {
    fn invalid_params(message: impl Into<String>) -> Self {
        McpError { code: -32602, message: message.into(), data: None }
    }
}

impl McpResponse {
    fn parse_error(err: &serde_json::Error) -> Self {
        McpResponse {
            jsonrpc: "2.0".to_string(),
            id: None,
            result: None,
            error: Some(McpError {
                code: -32700,
                message: format!("Parse error: {}", err),
                data: None,
            }),
        }
    }
}

/// Units library loaded into a fresh plugin registry
fn create_registry() -> PluginRegistry {
    isq_units::load_units_library(PluginRegistry::new())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

fn main() {
    init_logging();

    let config = match ServerConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = %e, "invalid server configuration");
            std::process::exit(1);
        }
    };
    if let Err(e) = config.install_registry() {
        error!(error = %e, "cannot build unit registry");
        std::process::exit(1);
    }

    let registry = create_registry();

    info!(version = SERVER_VERSION, protocol = PROTOCOL_VERSION, "ISQ MCP server started");
    info!(
        tools = registry.function_names().len() + 2,
        trace = config.trace,
        "server ready, waiting for requests"
    );

    let stdin = io::stdin();
    let mut reader = io::BufReader::new(stdin.lock());

    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => {
                info!("client disconnected (EOF)");
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                debug!(bytes = line.len(), "received");

                let Some(response) = process_line(&registry, line, config.trace) else {
                    continue;
                };

                let response_json = match serde_json::to_string(&response) {
                    Ok(s) => s,
                    Err(e) => {
                        error!(error = %e, "cannot serialize response");
                        continue;
                    }
                };
                let mut stdout = io::stdout().lock();
                if let Err(e) = writeln!(stdout, "{}", response_json).and_then(|_| stdout.flush()) {
                    error!(error = %e, "error writing response");
                    break;
                }
            }
            Err(e) => {
                error!(error = %e, "error reading input");
                break;
            }
        }
    }

    info!("server shutting down");
}

/// Handle one input line. Notifications (no id) produce no response.
fn process_line(registry: &PluginRegistry, line: &str, trace: bool) -> Option<McpResponse> {
    let request: McpRequest = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "error parsing request");
            return Some(McpResponse::parse_error(&e));
        }
    };

    debug!(method = %request.method, "processing");
    let response = handle_request(registry, &request, trace);

    if request.id.is_none() {
        debug!(method = %request.method, "notification processed (no response)");
        return None;
    }
    Some(response)
}

fn handle_request(registry: &PluginRegistry, request: &McpRequest, trace: bool) -> McpResponse {
    let result = match request.method.as_str() {
        // Lifecycle
        "initialize" => handle_initialize(&request.params),
        "initialized" => Ok(json!({})),
        "ping" => Ok(json!({})),

        // Tools
        "tools/list" => Ok(handle_tools_list(registry)),
        "tools/call" => handle_tool_call(registry, &request.params, trace),

        _ => Err(McpError {
            code: -32601,
            message: format!("Method not found: {}", request.method),
            data: None,
        }),
    };

    match result {
        Ok(r) => McpResponse {
            jsonrpc: "2.0".to_string(),
            id: request.id.clone(),
            result: Some(r),
            error: None,
        },
        Err(e) => McpResponse {
            jsonrpc: "2.0".to_string(),
            id: request.id.clone(),
            result: None,
            error: Some(e),
        },
    }
}

fn handle_initialize(params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let client_info = params.as_ref()
        .and_then(|p| p.get("clientInfo"))
        .and_then(|c| c.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or("unknown");

    // Use client's protocol version for compatibility
    let client_protocol = params.as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(|v| v.as_str())
        .unwrap_or(PROTOCOL_VERSION);

    info!(client = client_info, protocol = client_protocol, "client connected");

    Ok(json!({
        "protocolVersion": client_protocol,
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION,
            "description": "Dimensional analysis over the International System of Quantities"
        },
        "capabilities": {
            "tools": {
                "listChanged": false
            }
        },
        "instructions": "Quantities are objects {\"value\": number, \"unit\": symbol} with an optional \"uncertainty\". Mixing incompatible dimensions is an error, never coerced. Use 'help' to explore available functions."
    }))
}

/// JSON schema for one plugin argument
fn arg_schema(arg: &ArgMeta) -> JsonValue {
    let mut schema = match arg.typ {
        "Number" => json!({ "type": "number" }),
        "Integer" => json!({ "type": "integer" }),
        "Text" => json!({ "type": "string" }),
        "Quantity" => json!({
            "type": "object",
            "properties": {
                "value": { "type": "number" },
                "unit": { "type": "string" },
                "uncertainty": { "type": "number", "minimum": 0 }
            },
            "required": ["value", "unit"]
        }),
        _ => json!({}),
    };
    schema["description"] = json!(arg.description);
    if let Some(default) = arg.default {
        schema["default"] = json!(default);
    }
    schema
}

fn tool_for(meta: &FunctionMeta) -> JsonValue {
    let properties: serde_json::Map<String, JsonValue> = meta.args.iter()
        .map(|a| (a.name.to_string(), arg_schema(a)))
        .collect();
    let required: Vec<&str> = meta.args.iter()
        .filter(|a| !a.optional)
        .map(|a| a.name)
        .collect();

    json!({
        "name": meta.name,
        "description": format!("{} Usage: {}", meta.description, meta.usage),
        "inputSchema": {
            "type": "object",
            "properties": properties,
            "required": required
        }
    })
}

fn handle_tools_list(registry: &PluginRegistry) -> JsonValue {
    let mut tools: Vec<JsonValue> = registry.metas().iter().map(tool_for).collect();
    tools.push(json!({
        "name": "help",
        "description": "Get documentation for a function, or list all functions by category.",
        "inputSchema": {
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "Function name. Omit for general help."
                }
            }
        }
    }));
    tools.push(json!({
        "name": "list_functions",
        "description": "List all available functions, optionally by category.",
        "inputSchema": {
            "type": "object",
            "properties": {
                "category": {
                    "type": "string",
                    "description": "Filter: construction, conversion, algebra, inspection",
                    "enum": ["construction", "conversion", "algebra", "inspection"]
                }
            }
        }
    }));
    json!({ "tools": tools })
}

fn handle_tool_call(
    registry: &PluginRegistry,
    params: &Option<JsonValue>,
    trace: bool,
) -> Result<JsonValue, McpError> {
    let params = params.as_ref()
        .ok_or_else(|| McpError::invalid_params("Missing params"))?;

    let name = params.get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;

    let args = params.get("arguments").cloned().unwrap_or(json!({}));
    if !args.is_object() {
        return Err(McpError::invalid_params("Tool arguments must be an object"));
    }

    let mut ctx = EvalContext::new().with_tracing(trace);
    let outcome = match name {
        "help" => registry.help(args.get("name").and_then(|v| v.as_str())),
        "list_functions" => Ok(registry.list_functions(args.get("category").and_then(|v| v.as_str()))),
        _ => call_plugin(registry, name, &args, &mut ctx),
    };

    let mut result = match outcome {
        Ok(data) => tool_result(data),
        Err(e) => {
            debug!(tool = name, code = %e.code, "tool call failed");
            tool_error(&e)
        }
    };
    if trace {
        result["trace"] = json!(ctx.take_trace());
    }
    Ok(result)
}

/// Named tool arguments to the positional list the plugin expects. Stops at
/// the first absent argument so trailing optionals keep their defaults.
fn positional_args(meta: &FunctionMeta, args: &JsonValue) -> Vec<JsonValue> {
    meta.args.iter()
        .map_while(|a| args.get(a.name).cloned())
        .collect()
}

fn call_plugin(
    registry: &PluginRegistry,
    name: &str,
    args: &JsonValue,
    ctx: &mut EvalContext,
) -> Result<JsonValue, IsqError> {
    // Unknown names fall through to the registry for its suggestions
    let positional = registry.get_function(name)
        .map(|f| positional_args(&f.meta(), args))
        .unwrap_or_default();
    registry.call_function(name, &positional, ctx)
}

fn tool_result(data: JsonValue) -> JsonValue {
    let text = match data.get("display").and_then(|d| d.as_str()) {
        Some(display) => display.to_string(),
        None => data.to_string(),
    };
    json!({
        "content": [{ "type": "text", "text": text }],
        "data": data,
        "isError": false
    })
}

fn tool_error(err: &IsqError) -> JsonValue {
    json!({
        "content": [{ "type": "text", "text": err.to_string() }],
        "error": err.to_json(),
        "isError": true
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(id: Option<i64>, method: &str, params: JsonValue) -> String {
        let mut req = json!({ "jsonrpc": "2.0", "method": method, "params": params });
        if let Some(id) = id {
            req["id"] = json!(id);
        }
        req.to_string()
    }

    fn call(tool: &str, arguments: JsonValue) -> JsonValue {
        let registry = create_registry();
        let line = request(Some(1), "tools/call", json!({ "name": tool, "arguments": arguments }));
        let response = process_line(&registry, &line, false).unwrap();
        assert!(response.error.is_none());
        response.result.unwrap()
    }

    #[test]
    fn test_initialize() {
        let registry = create_registry();
        let line = request(Some(1), "initialize", json!({
            "protocolVersion": "2025-06-18",
            "clientInfo": { "name": "test" }
        }));
        let response = process_line(&registry, &line, false).unwrap();
        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], "2025-06-18");
        assert_eq!(result["serverInfo"]["name"], SERVER_NAME);
        assert_eq!(response.id, Some(json!(1)));
    }

    #[test]
    fn test_notification_has_no_response() {
        let registry = create_registry();
        let line = request(None, "initialized", json!({}));
        assert!(process_line(&registry, &line, false).is_none());
    }

    #[test]
    fn test_parse_error() {
        let registry = create_registry();
        let response = process_line(&registry, "{ not json", false).unwrap();
        assert_eq!(response.error.unwrap().code, -32700);
        assert!(response.id.is_none());
    }

    #[test]
    fn test_unknown_method() {
        let registry = create_registry();
        let response = process_line(&registry, &request(Some(7), "resources/list", json!({})), false).unwrap();
        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[test]
    fn test_tools_list() {
        let registry = create_registry();
        let response = process_line(&registry, &request(Some(2), "tools/list", json!({})), false).unwrap();
        let result = response.result.unwrap();
        let tools = result["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 18);

        let convert = tools.iter().find(|t| t["name"] == "convert").unwrap();
        assert_eq!(convert["inputSchema"]["required"], json!(["quantity", "to_unit"]));
        assert_eq!(convert["inputSchema"]["properties"]["quantity"]["type"], "object");
        assert!(tools.iter().any(|t| t["name"] == "help"));
    }

    #[test]
    fn test_tool_convert() {
        let result = call("convert", json!({
            "quantity": { "value": 2, "unit": "km" },
            "to_unit": "m"
        }));
        assert_eq!(result["isError"], false);
        assert_eq!(result["data"]["value"], 2000.0);
        assert_eq!(result["content"][0]["text"], "2000 m");
    }

    #[test]
    fn test_tool_optional_argument() {
        let all = call("units", json!({}));
        let like = call("units", json!({ "like": "h" }));
        assert!(all["data"].as_array().unwrap().len() > like["data"].as_array().unwrap().len());
    }

    #[test]
    fn test_tool_error_is_result() {
        let result = call("add", json!({
            "a": { "value": 5, "unit": "m" },
            "b": { "value": 3, "unit": "kg" }
        }));
        assert_eq!(result["isError"], true);
        assert_eq!(result["error"]["code"], "INCOMPATIBLE_DIMENSIONS");
    }

    #[test]
    fn test_tool_missing_argument() {
        let result = call("convert", json!({ "to_unit": "m" }));
        assert_eq!(result["isError"], true);
        assert_eq!(result["error"]["code"], "ARG_COUNT");
    }

    #[test]
    fn test_unknown_tool() {
        let result = call("convrt", json!({}));
        assert_eq!(result["isError"], true);
        assert_eq!(result["error"]["code"], "UNDEFINED_FUNC");
    }

    #[test]
    fn test_help() {
        let result = call("help", json!({ "name": "sqrt" }));
        assert_eq!(result["data"]["name"], "sqrt");
        let result = call("help", json!({}));
        assert!(result["data"]["functions"]["algebra"].as_array().unwrap().contains(&json!("divide")));
    }

    #[test]
    fn test_list_functions_by_category() {
        let result = call("list_functions", json!({ "category": "conversion" }));
        let names: Vec<&str> = result["data"].as_array().unwrap()
            .iter()
            .map(|f| f["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["convert", "to_base"]);
    }

    #[test]
    fn test_exponent_overflow_keeps_serving() {
        let registry = create_registry();
        let line = request(Some(4), "tools/call", json!({
            "name": "power",
            "arguments": { "quantity": { "value": 2, "unit": "m²" }, "n": -2147483648i64 }
        }));
        let result = process_line(&registry, &line, false).unwrap().result.unwrap();
        assert_eq!(result["isError"], true);
        assert_eq!(result["error"]["code"], "DOMAIN_ERROR");

        let line = request(Some(5), "tools/call", json!({
            "name": "power",
            "arguments": { "quantity": { "value": 2, "unit": "m" }, "n": 2147483647i64 }
        }));
        let result = process_line(&registry, &line, false).unwrap().result.unwrap();
        assert_eq!(result["isError"], false);

        let pong = process_line(&registry, &request(Some(6), "ping", json!({})), false).unwrap();
        assert_eq!(pong.id, Some(json!(6)));
        assert_eq!(pong.result, Some(json!({})));
    }

    #[test]
    fn test_named_unit_in_result() {
        let result = call("multiply", json!({
            "a": { "value": 2, "unit": "N" },
            "b": { "value": 3, "unit": "m" }
        }));
        assert_eq!(result["content"][0]["text"], "6 J");
    }

    #[test]
    fn test_trace_attached_when_enabled() {
        let registry = create_registry();
        let line = request(Some(8), "tools/call", json!({
            "name": "convert",
            "arguments": { "quantity": { "value": 2, "unit": "km" }, "to_unit": "m" }
        }));

        let plain = process_line(&registry, &line, false).unwrap().result.unwrap();
        assert!(plain.get("trace").is_none());

        let traced = process_line(&registry, &line, true).unwrap().result.unwrap();
        let steps = traced["trace"].as_array().unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0]["function"], "convert");
        assert_eq!(steps[0]["ok"], true);
        assert_eq!(steps[0]["result"]["value"], 2000.0);

        let line = request(Some(9), "tools/call", json!({
            "name": "sqrt",
            "arguments": { "quantity": { "value": 2, "unit": "m" } }
        }));
        let failed = process_line(&registry, &line, true).unwrap().result.unwrap();
        assert_eq!(failed["isError"], true);
        assert_eq!(failed["trace"][0]["ok"], false);
        assert_eq!(failed["trace"][0]["result"]["code"], "DOMAIN_ERROR");
    }

    #[test]
    fn test_missing_params() {
        let registry = create_registry();
        let response = process_line(&registry, &request(Some(3), "tools/call", JsonValue::Null), false).unwrap();
        assert_eq!(response.error.unwrap().code, -32602);
    }
}
