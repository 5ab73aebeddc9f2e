use serde_json::{json, Value};

use super::types::{ChatCompletion, ChatMessage, ChatRequest, ToolCall, ToolChoice, ToolDefinition};
use crate::{LoomError, Result};

/// Build the Chat Completions request body.
///
/// Per-request parameters win over the client default temperature.
pub fn chat_request_body(model: &str, default_temperature: Option<f32>, req: &ChatRequest) -> Value {
    let messages: Vec<Value> = req.messages.iter().map(message_to_json).collect();
    let mut body = json!({
        "model": model,
        "messages": messages,
    });
    if let Some(max_tokens) = req.params.max_tokens {
        body["max_tokens"] = json!(max_tokens);
    }
    if let Some(t) = req.params.temperature.or(default_temperature) {
        body["temperature"] = json!(t);
    }
    if req.exposes_tools() {
        let tools: Vec<Value> = req.tools.iter().map(tool_to_json).collect();
        body["tools"] = json!(tools);
        body["tool_choice"] = match req.tool_choice {
            ToolChoice::Required => json!("required"),
            _ => json!("auto"),
        };
    }
    body
}

/// Serialize one message in the Chat Completions wire shape
pub fn message_to_json(msg: &ChatMessage) -> Value {
    let mut v = json!({ "role": msg.role.as_str() });
    if msg.tool_calls.is_empty() {
        v["content"] = json!(msg.content);
    } else {
        // Assistant turns that only carry calls send a null content
        v["content"] = if msg.content.is_empty() {
            Value::Null
        } else {
            json!(msg.content)
        };
        let calls: Vec<Value> = msg
            .tool_calls
            .iter()
            .map(|c| {
                json!({
                    "id": c.id.clone().unwrap_or_default(),
                    "type": "function",
                    "function": {
                        "name": c.name,
                        "arguments": c.arguments.to_string(),
                    }
                })
            })
            .collect();
        v["tool_calls"] = json!(calls);
    }
    if let Some(id) = &msg.tool_call_id {
        v["tool_call_id"] = json!(id);
    }
    v
}

fn tool_to_json(tool: &ToolDefinition) -> Value {
    json!({
        "type": "function",
        "function": {
            "name": tool.name,
            "description": tool.description,
            "parameters": tool.parameters,
        }
    })
}

/// Parse `choices[0].message.tool_calls` from a Chat Completions reply
pub fn parse_tool_calls_from_chat(v: &Value) -> Vec<ToolCall> {
    let mut calls = Vec::new();
    let Some(tc_arr) = v
        .get("choices")
        .and_then(|x| x.as_array())
        .and_then(|arr| arr.first())
        .and_then(|first| first.get("message"))
        .and_then(|m| m.get("tool_calls"))
        .and_then(|x| x.as_array())
    else {
        return calls;
    };
    for tc in tc_arr {
        let id = tc.get("id").and_then(|x| x.as_str()).map(|s| s.to_string());
        if let Some(func) = tc.get("function") {
            let name = func
                .get("name")
                .and_then(|n| n.as_str())
                .unwrap_or("")
                .to_string();
            let args = match func.get("arguments") {
                Some(Value::String(s)) => serde_json::from_str::<Value>(s).unwrap_or(json!({})),
                Some(v) => v.clone(),
                None => json!({}),
            };
            if !name.is_empty() {
                calls.push(ToolCall {
                    id,
                    name,
                    arguments: args,
                });
            }
        }
    }
    calls
}

/// Turn a raw Chat Completions reply into a `ChatCompletion`
pub fn parse_chat_completion(v: &Value) -> Result<ChatCompletion> {
    let message = v
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .ok_or_else(|| LoomError::Llm("Missing choices[0].message in chat completions".into()))?;
    let content = message
        .get("content")
        .and_then(|c| c.as_str())
        .map(|s| s.to_string());
    Ok(ChatCompletion {
        content,
        tool_calls: parse_tool_calls_from_chat(v),
        model: v.get("model").and_then(|m| m.as_str()).map(|s| s.to_string()),
        usage: v.get("usage").cloned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::types::GenerationParams;

    #[test]
    fn body_omits_tools_when_choice_is_none() {
        let mut req = ChatRequest::from_prompt("hi", GenerationParams::new(300, 0.7));
        req.tools = vec![ToolDefinition {
            name: "generate_story".into(),
            description: "d".into(),
            parameters: json!({"type": "object"}),
        }];
        let body = chat_request_body("gpt-4o", None, &req);
        assert!(body.get("tools").is_none());
        assert!(body.get("tool_choice").is_none());
        assert_eq!(body["max_tokens"], 300);
    }

    #[test]
    fn request_temperature_overrides_default() {
        let req = ChatRequest::from_prompt("hi", GenerationParams::new(500, 0.3));
        let body = chat_request_body("gpt-4o", Some(0.9), &req);
        let t = body["temperature"].as_f64().unwrap_or_default();
        assert!((t - 0.3).abs() < 1e-6);

        let bare = ChatRequest::from_prompt("hi", GenerationParams::default());
        let body = chat_request_body("gpt-4o", None, &bare);
        assert!(body.get("temperature").is_none());
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn tool_call_message_has_null_content() {
        let msg = ChatMessage::assistant_tool_calls(
            None,
            vec![ToolCall {
                id: Some("call_1".into()),
                name: "translate_text".into(),
                arguments: json!({"text": "hola"}),
            }],
        );
        let v = message_to_json(&msg);
        assert!(v["content"].is_null());
        assert_eq!(v["tool_calls"][0]["function"]["name"], "translate_text");
        assert_eq!(
            v["tool_calls"][0]["function"]["arguments"],
            "{\"text\":\"hola\"}"
        );
    }
}
