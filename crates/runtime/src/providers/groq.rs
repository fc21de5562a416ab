//! Groq chat completions backend.
//!
//! Groq serves the OpenAI-compatible `/chat/completions` API, so the wire
//! types here follow that format.

use std::time::Duration;

use crate::model::{
    Backend, Message, ModelError, ModelRequest, ModelResponse, Part, Role, ToolCall, ToolChoice,
    ToolSpec, Usage,
};
use crate::tools::Arguments;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

pub const GROQ_API_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

// ─────────────────────────────────────────────────────────────────────────────
// API Wire Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ApiTool<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<ApiToolChoice<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parallel_tool_calls: Option<bool>,
}

#[derive(Debug, Serialize)]
struct ApiMessage {
    role: &'static str,
    content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<ApiToolCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiToolCall {
    id: String,
    #[serde(rename = "type", default = "function_type")]
    call_type: String,
    function: ApiFunctionCall,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiFunctionCall {
    name: String,
    /// JSON-encoded argument object.
    #[serde(default)]
    arguments: String,
}

fn function_type() -> String {
    "function".to_string()
}

#[derive(Debug, Serialize)]
struct ApiTool<'a> {
    #[serde(rename = "type")]
    tool_type: &'static str,
    function: ApiFunction<'a>,
}

#[derive(Debug, Serialize)]
struct ApiFunction<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a Value,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ApiToolChoice<'a> {
    Mode(&'static str),
    Function {
        #[serde(rename = "type")]
        choice_type: &'static str,
        function: ApiFunctionName<'a>,
    },
}

#[derive(Debug, Serialize)]
struct ApiFunctionName<'a> {
    name: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
    #[serde(default)]
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ApiResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ApiToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

// ─────────────────────────────────────────────────────────────────────────────
// Backend Implementation
// ─────────────────────────────────────────────────────────────────────────────

/// Builder for creating a Groq backend.
#[derive(Debug, Clone)]
pub struct GroqBackendBuilder {
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
    max_tokens: Option<u32>,
    timeout: Option<Duration>,
}

impl GroqBackendBuilder {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: GROQ_API_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: None,
            timeout: None,
        }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Deadline for each model invocation.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<GroqBackend, ModelError> {
        let mut client = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            client = client.timeout(timeout);
        }
        let client = client
            .build()
            .map_err(|e| ModelError::Config(e.to_string()))?;

        Ok(GroqBackend {
            client,
            api_key: self.api_key,
            model: self.model,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        })
    }
}

/// Groq API backend.
pub struct GroqBackend {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl GroqBackend {
    pub fn builder(api_key: impl Into<String>, model: impl Into<String>) -> GroqBackendBuilder {
        GroqBackendBuilder::new(api_key, model)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn role_to_api(role: Role) -> &'static str {
        match role {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }

    /// One API message per domain message, except tool messages, which
    /// expand to one API message per result.
    fn message_to_api(msg: &Message) -> Vec<ApiMessage> {
        if msg.role == Role::Tool {
            return msg
                .tool_results()
                .into_iter()
                .map(|result| ApiMessage {
                    role: "tool",
                    content: Some(result.content.clone()),
                    tool_calls: Vec::new(),
                    tool_call_id: Some(result.tool_call_id.clone()),
                })
                .collect();
        }

        let tool_calls: Vec<ApiToolCall> = msg
            .tool_calls()
            .into_iter()
            .map(|call| ApiToolCall {
                id: call.id,
                call_type: function_type(),
                function: ApiFunctionCall {
                    name: call.name,
                    arguments: Value::Object(call.arguments).to_string(),
                },
            })
            .collect();

        vec![ApiMessage {
            role: Self::role_to_api(msg.role),
            content: msg.content(),
            tool_calls,
            tool_call_id: None,
        }]
    }

    fn tool_to_api(spec: &ToolSpec) -> ApiTool<'_> {
        ApiTool {
            tool_type: "function",
            function: ApiFunction {
                name: &spec.name,
                description: &spec.description,
                parameters: &spec.input_schema,
            },
        }
    }

    fn tool_choice_to_api(choice: &ToolChoice) -> ApiToolChoice<'_> {
        match choice {
            ToolChoice::Auto => ApiToolChoice::Mode("auto"),
            ToolChoice::Required => ApiToolChoice::Mode("required"),
            ToolChoice::Forced(name) => ApiToolChoice::Function {
                choice_type: "function",
                function: ApiFunctionName { name },
            },
        }
    }

    /// Parse the JSON-encoded argument string. An empty string is an empty object.
    fn parse_arguments(raw: &str) -> Result<Arguments, String> {
        if raw.trim().is_empty() {
            return Ok(Arguments::new());
        }
        match serde_json::from_str(raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(format!("expected a JSON object, got {other}")),
            Err(e) => Err(format!("not valid JSON: {e}")),
        }
    }

    /// Unreadable arguments stay attached to their call so the invoker can
    /// answer that call alone with an error result.
    fn response_to_message(message: ApiResponseMessage) -> Message {
        let mut parts = Vec::new();
        if let Some(text) = message.content {
            parts.push(Part::Text(text));
        }
        for call in message.tool_calls.unwrap_or_default() {
            let ApiToolCall { id, function, .. } = call;
            let tool_call = match Self::parse_arguments(&function.arguments) {
                Ok(arguments) => ToolCall::new(id, function.name, arguments),
                Err(reason) => {
                    warn!(
                        tool = %function.name,
                        %id,
                        raw = %function.arguments,
                        %reason,
                        "Could not read tool arguments"
                    );
                    ToolCall::malformed(id, function.name, reason)
                }
            };
            parts.push(Part::ToolCall(tool_call));
        }

        Message {
            role: Role::Assistant,
            parts,
        }
    }
}

impl std::fmt::Debug for GroqBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqBackend")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Display for GroqBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "groq({})", self.model)
    }
}

impl Backend for GroqBackend {
    async fn call(&self, request: ModelRequest<'_>) -> Result<ModelResponse, ModelError> {
        let has_tools = !request.tools.is_empty();

        let api_request = ApiRequest {
            model: &self.model,
            messages: request
                .messages
                .iter()
                .flat_map(Self::message_to_api)
                .collect(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            tools: request.tools.iter().map(Self::tool_to_api).collect(),
            tool_choice: has_tools.then(|| Self::tool_choice_to_api(request.tool_choice)),
            parallel_tool_calls: (has_tools && !request.parallel_tool_calls).then_some(false),
        };

        let url = format!("{}/chat/completions", self.base_url);
        debug!(model = %self.model, %url, tools = request.tools.len(), "Calling LLM API");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&api_request)
            .send()
            .await
            .map_err(|e| ModelError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Api { status, body });
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| ModelError::InvalidResponse(e.to_string()))?;

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::InvalidResponse("no choices in response".into()))?;

        let message = Self::response_to_message(choice.message);
        let usage = api_response
            .usage
            .map(|usage| Usage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
            })
            .unwrap_or_default();

        Ok(ModelResponse { message, usage })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::ChatTurn;
    use crate::model::ToolResult;
    use crate::respond;
    use crate::tools::registry::tests::stub;
    use crate::tools::{BindOptions, ToolRegistry};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup_mock_server(response_body: Value) -> (MockServer, GroqBackend) {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test_api_key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(response_body))
            .mount(&mock_server)
            .await;

        let backend = GroqBackend::builder("test_api_key", DEFAULT_MODEL)
            .base_url(mock_server.uri())
            .build()
            .unwrap();
        (mock_server, backend)
    }

    fn weather_spec() -> ToolSpec {
        ToolSpec {
            name: "fetch_weather".into(),
            description: "Fetch current weather".into(),
            input_schema: json!({
                "type": "object",
                "properties": {"location": {"type": "string"}},
                "required": ["location"]
            }),
        }
    }

    #[tokio::test]
    async fn text_response() {
        let (_server, backend) = setup_mock_server(json!({
            "choices": [{
                "message": {"role": "assistant", "content": "Hello!"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15}
        }))
        .await;

        let messages = [Message::system("You are helpful."), Message::user("Hi")];
        let response = backend.call(ModelRequest::plain(&messages)).await.unwrap();

        assert_eq!(response.message.role, Role::Assistant);
        assert_eq!(response.message.text(), "Hello!");
        assert!(response.message.tool_calls().is_empty());
        assert_eq!(
            response.usage,
            Usage {
                input_tokens: 12,
                output_tokens: 3
            }
        );
    }

    #[tokio::test]
    async fn tool_call_response() {
        let (_server, backend) = setup_mock_server(json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {
                            "name": "fetch_weather",
                            "arguments": "{\"location\":\"Paris\"}"
                        }
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        }))
        .await;

        let messages = [Message::user("Weather in Paris?")];
        let tools = [weather_spec()];
        let request = ModelRequest {
            messages: &messages,
            tools: &tools,
            tool_choice: &ToolChoice::Auto,
            parallel_tool_calls: true,
        };
        let response = backend.call(request).await.unwrap();

        assert_eq!(response.message.content(), None);
        let calls = response.message.tool_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].id, "call_1");
        assert_eq!(calls[0].name, "fetch_weather");
        assert_eq!(calls[0].arguments["location"], "Paris");
        assert_eq!(response.usage, Usage::default());
    }

    #[tokio::test]
    async fn request_carries_tools_and_policy() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({
                "model": DEFAULT_MODEL,
                "temperature": 0.5,
                "tools": [{
                    "type": "function",
                    "function": {"name": "fetch_weather"}
                }],
                "tool_choice": {"type": "function", "function": {"name": "fetch_weather"}},
                "parallel_tool_calls": false,
                "messages": [
                    {"role": "user", "content": "Weather?"},
                    {
                        "role": "assistant",
                        "content": null,
                        "tool_calls": [{
                            "id": "t1",
                            "type": "function",
                            "function": {"name": "fetch_weather", "arguments": "{\"location\":\"Oslo\"}"}
                        }]
                    },
                    {"role": "tool", "tool_call_id": "t1", "content": "Sunny"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "It is sunny."}}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let backend = GroqBackend::builder("key", DEFAULT_MODEL)
            .base_url(format!("{}/", mock_server.uri()))
            .temperature(0.5)
            .build()
            .unwrap();

        let mut arguments = Arguments::new();
        arguments.insert("location".into(), json!("Oslo"));
        let messages = [
            Message::user("Weather?"),
            Message {
                role: Role::Assistant,
                parts: vec![Part::ToolCall(ToolCall::new("t1", "fetch_weather", arguments))],
            },
            Message::tool_result(ToolResult::success("t1", "Sunny")),
        ];
        let tools = [weather_spec()];
        let choice = ToolChoice::Forced("fetch_weather".into());
        let request = ModelRequest {
            messages: &messages,
            tools: &tools,
            tool_choice: &choice,
            parallel_tool_calls: false,
        };

        let response = backend.call(request).await.unwrap();
        assert_eq!(response.message.text(), "It is sunny.");
    }

    #[tokio::test]
    async fn plain_request_omits_tool_fields() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "ok"}}]
            })))
            .mount(&mock_server)
            .await;

        let backend = GroqBackend::builder("key", DEFAULT_MODEL)
            .base_url(mock_server.uri())
            .build()
            .unwrap();
        let messages = [Message::user("hi")];
        backend.call(ModelRequest::plain(&messages)).await.unwrap();

        let received = mock_server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&received[0].body).unwrap();
        assert!(body.get("tools").is_none());
        assert!(body.get("tool_choice").is_none());
        assert!(body.get("parallel_tool_calls").is_none());
        assert!(body.get("max_tokens").is_none());
    }

    #[tokio::test]
    async fn api_error_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&mock_server)
            .await;

        let backend = GroqBackend::builder("bad", DEFAULT_MODEL)
            .base_url(mock_server.uri())
            .build()
            .unwrap();
        let messages = [Message::user("hi")];
        let err = backend
            .call(ModelRequest::plain(&messages))
            .await
            .unwrap_err();

        match err {
            ModelError::Api { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "invalid api key");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    async fn sent_body(choice: ToolChoice, parallel_tool_calls: bool) -> Value {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "ok"}}]
            })))
            .mount(&mock_server)
            .await;

        let backend = GroqBackend::builder("key", DEFAULT_MODEL)
            .base_url(mock_server.uri())
            .build()
            .unwrap();
        let messages = [Message::user("Weather in Lima?")];
        let tools = [weather_spec()];
        let request = ModelRequest {
            messages: &messages,
            tools: &tools,
            tool_choice: &choice,
            parallel_tool_calls,
        };
        backend.call(request).await.unwrap();

        let received = mock_server.received_requests().await.unwrap();
        serde_json::from_slice(&received[0].body).unwrap()
    }

    #[tokio::test]
    async fn auto_choice_with_tools() {
        let body = sent_body(ToolChoice::Auto, true).await;
        assert_eq!(body["tool_choice"], "auto");
        assert_eq!(body["tools"][0]["function"]["name"], "fetch_weather");
        assert!(body.get("parallel_tool_calls").is_none());
    }

    #[tokio::test]
    async fn required_choice_with_tools() {
        let body = sent_body(ToolChoice::Required, false).await;
        assert_eq!(body["tool_choice"], "required");
        assert_eq!(body["parallel_tool_calls"], false);
    }

    #[tokio::test]
    async fn malformed_call_does_not_sink_its_batch() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{
                    "message": {
                        "content": null,
                        "tool_calls": [
                            {
                                "id": "a",
                                "type": "function",
                                "function": {"name": "search_web", "arguments": "{\"query\":\"rust\"}"}
                            },
                            {
                                "id": "b",
                                "type": "function",
                                "function": {"name": "search_web", "arguments": "{\"query\": \"rust"}
                            }
                        ]
                    }
                }]
            })))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "Found one result."}}]
            })))
            .mount(&mock_server)
            .await;

        let backend = GroqBackend::builder("key", DEFAULT_MODEL)
            .base_url(mock_server.uri())
            .build()
            .unwrap();
        let model = ToolRegistry::new(vec![stub("search_web")])
            .unwrap()
            .bind(backend, BindOptions::default())
            .unwrap();

        let exchange = respond::run_exchange(&[ChatTurn::user("Search rust")], &model, 5)
            .await
            .unwrap();

        assert_eq!(exchange.answer, "Found one result.");
        assert_eq!(exchange.iterations, 2);
        let results: Vec<&ToolResult> = exchange
            .conversation
            .iter()
            .flat_map(|m| m.tool_results())
            .collect();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0], &ToolResult::success("a", "ok"));
        assert_eq!(results[1].tool_call_id, "b");
        assert!(results[1].is_error);
        assert!(results[1].content.starts_with(
            "Error executing tool 'search_web': invalid arguments: not valid JSON: "
        ));

        // Both results went back to the model on the second request.
        let received = mock_server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&received[1].body).unwrap();
        let tool_ids: Vec<&str> = body["messages"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|m| m["role"] == "tool")
            .map(|m| m["tool_call_id"].as_str().unwrap())
            .collect();
        assert_eq!(tool_ids, vec!["a", "b"]);
    }

    #[test]
    fn argument_strings() {
        assert!(GroqBackend::parse_arguments("").unwrap().is_empty());
        assert_eq!(
            GroqBackend::parse_arguments("[1, 2]").unwrap_err(),
            "expected a JSON object, got [1,2]"
        );
        assert!(
            GroqBackend::parse_arguments("{not json")
                .unwrap_err()
                .starts_with("not valid JSON: ")
        );
    }

    #[test]
    fn display() {
        let backend = GroqBackend::builder("key", "llama-3.3-70b-versatile")
            .build()
            .unwrap();
        assert_eq!(backend.to_string(), "groq(llama-3.3-70b-versatile)");
    }
}
