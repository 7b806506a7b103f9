use beatchat::{
    catalog, ChatProvider, CompletionRequest, FunctionCallPolicy, Message, OpenAiProvider,
    ProviderError, Role,
};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion(message: Value) -> Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": message,
            "finish_reason": "stop"
        }]
    })
}

fn first_round(text: &str) -> CompletionRequest {
    CompletionRequest {
        system: Some("You are Beat Buddy.".to_string()),
        messages: vec![Message::user(text)],
        functions: Some(catalog()),
        function_call: Some(FunctionCallPolicy::Auto),
        max_tokens: 250,
        temperature: 0.7,
    }
}

#[tokio::test]
async fn test_function_call_reply_decoded() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "function_call": "auto",
            "max_tokens": 250
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!({
            "role": "assistant",
            "content": null,
            "function_call": {
                "name": "searchTrack",
                "arguments": "{\"songTitle\":\"Yesterday\"}"
            }
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(&server.uri(), "sk-test", "gpt-4o-mini");
    let reply = provider
        .complete(first_round("Find me the song Yesterday"))
        .await
        .unwrap();

    assert_eq!(reply.role, Role::Assistant);
    assert_eq!(reply.content, None);
    let call = reply.function_call.unwrap();
    assert_eq!(call.name, "searchTrack");
    assert_eq!(call.arguments, r#"{"songTitle":"Yesterday"}"#);

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let functions = body["functions"].as_array().unwrap();
    assert_eq!(functions.len(), 10);
    assert_eq!(functions[0]["name"], "searchTrack");
    assert_eq!(functions[0]["parameters"]["required"][0], "songTitle");
    assert_eq!(body["messages"][0]["role"], "system");
}

#[tokio::test]
async fn test_tool_call_reply_read_as_function_call() {
    let server = MockServer::start().await;

    let mut body = completion(json!({
        "role": "assistant",
        "content": null,
        "tool_calls": [{
            "id": "call_1",
            "type": "function",
            "function": {"name": "printPlaylist", "arguments": "{}"}
        }]
    }));
    body["choices"][0]["finish_reason"] = json!("tool_calls");

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(&server.uri(), "sk-test", "gpt-4o-mini");
    let reply = provider
        .complete(first_round("What's on my playlist?"))
        .await
        .unwrap();

    assert_eq!(reply.content, None);
    let call = reply.function_call.unwrap();
    assert_eq!(call.name, "printPlaylist");
    assert_eq!(call.arguments, "{}");
}

#[tokio::test]
async fn test_follow_up_sends_no_catalog() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!({
            "role": "assistant",
            "content": "Your playlist is empty."
        }))))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(&server.uri(), "sk-test", "gpt-4o-mini");
    let reply = provider
        .complete(CompletionRequest {
            system: None,
            messages: vec![
                Message::user("What's on my playlist?"),
                Message::assistant(
                    None,
                    Some(beatchat::FunctionCall {
                        name: "printPlaylist".to_string(),
                        arguments: "{}".to_string(),
                    }),
                ),
                Message::function_result("printPlaylist", "[]"),
            ],
            functions: None,
            function_call: None,
            max_tokens: 75,
            temperature: 0.7,
        })
        .await
        .unwrap();

    assert_eq!(reply.content.as_deref(), Some("Your playlist is empty."));
    assert!(reply.function_call.is_none());

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body.get("functions").is_none());
    assert!(body.get("function_call").is_none());
    assert_eq!(body["max_tokens"], 75);
    assert_eq!(body["messages"][0]["role"], "user");
    assert_eq!(body["messages"][2]["name"], "printPlaylist");
}

#[tokio::test]
async fn test_api_error_surfaces() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {
                "message": "Incorrect API key provided",
                "type": "invalid_request_error",
                "param": null,
                "code": "invalid_api_key"
            }
        })))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(&server.uri(), "sk-wrong", "gpt-4o-mini");
    let err = provider.complete(first_round("Hello")).await.unwrap_err();

    assert!(matches!(err, ProviderError::Api(_)));
    assert!(err.to_string().contains("Incorrect API key"));
}

#[tokio::test]
async fn test_empty_choices() {
    let server = MockServer::start().await;

    let mut body = completion(json!({"role": "assistant", "content": "unused"}));
    body["choices"] = json!([]);

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(&server.uri(), "sk-test", "gpt-4o-mini");
    let err = provider.complete(first_round("Hello")).await.unwrap_err();
    assert!(matches!(err, ProviderError::EmptyResponse));
}
