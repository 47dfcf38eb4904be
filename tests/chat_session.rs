use almanac::client::{Agent, CliClient, Console, OllamaTransport, Palette};
use almanac::config::Config;
use almanac::search::DuckDuckGo;
use almanac::tools::{ToolContext, default_toolset};

use clap::Parser;
use serde_json::{Value, json};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

fn completion(message: Value, finish_reason: &str) -> Value {
    json!({
        "id": "chatcmpl-7",
        "object": "chat.completion",
        "created": 1717243200,
        "model": "llama3.2:1b",
        "system_fingerprint": "fp_ollama",
        "choices": [{ "index": 0, "message": message, "finish_reason": finish_reason }],
        "usage": { "prompt_tokens": 40, "completion_tokens": 12, "total_tokens": 52 }
    })
}

fn tool_call(id: &str, name: &str, arguments: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(completion(
        json!({
            "role": "assistant",
            "content": "",
            "tool_calls": [{
                "id": id,
                "type": "function",
                "function": { "name": name, "arguments": arguments.to_string() }
            }]
        }),
        "tool_calls",
    ))
}

fn reply(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(completion(
        json!({ "role": "assistant", "content": content }),
        "stop",
    ))
}

/// Plays the model's second round: answers by quoting the tool result it was sent.
struct QuoteToolResult;

impl Respond for QuoteToolResult {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = request.body_json().unwrap_or_default();
        let result = body["messages"]
            .as_array()
            .and_then(|messages| messages.iter().find(|message| message["role"] == "tool"))
            .and_then(|message| message["content"].as_str())
            .unwrap_or("nothing");
        reply(&format!("According to my tools: {result}"))
    }
}

async fn run_session(model_url: &str, search_url: &str, input: &'static str) -> String {
    let config = Config::parse_from(["almanac", "--base-url", model_url, "--no-color"]);
    let http = config.http_client().unwrap();
    let transport = OllamaTransport::new(&config, http.clone());
    let search = DuckDuckGo::new(http).with_endpoint(search_url);
    let agent = Agent::new(
        transport,
        default_toolset().unwrap(),
        ToolContext::new(search, config.max_results),
    );
    let console = Console::new(input.as_bytes(), Vec::new(), Palette::new(config.color()));

    let mut client = CliClient::new(agent, console);
    client.chat().await.unwrap();
    String::from_utf8(client.into_console().into_writer()).unwrap()
}

async fn model_requests(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|request| request.body_json().unwrap())
        .collect()
}

#[tokio::test]
async fn date_question_runs_the_date_tool_and_quotes_it() {
    let model = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(tool_call("call_date", "get_current_date", json!({})))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&model)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(QuoteToolResult)
        .mount(&model)
        .await;

    let output = run_session(
        &format!("{}/v1", model.uri()),
        "http://127.0.0.1:9/",
        "What day is today?\nexit\n",
    )
    .await;

    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    assert!(output.contains("Assistant: According to my tools: "), "{output}");
    assert!(output.contains(&today), "{output}");

    let requests = model_requests(&model).await;
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0]["tools"].as_array().map(Vec::len), Some(2));
    assert_eq!(requests[0]["stream"], false);
    assert!(requests[1].get("tools").is_none());

    let messages = requests[1]["messages"].as_array().unwrap();
    let roles: Vec<_> = messages.iter().map(|m| m["role"].as_str().unwrap()).collect();
    assert_eq!(roles, ["system", "user", "assistant", "tool"]);
    assert_eq!(messages[3]["tool_call_id"], "call_date");
}

#[tokio::test]
async fn general_question_is_answered_in_one_round_trip() {
    let model = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(reply("HTTP stands for HyperText Transfer Protocol."))
        .mount(&model)
        .await;

    let output = run_session(
        &format!("{}/v1", model.uri()),
        "http://127.0.0.1:9/",
        "What does HTTP stand for?\nquit\n",
    )
    .await;

    assert!(output.contains("Assistant: HTTP stands for HyperText Transfer Protocol.\n"));
    let requests = model_requests(&model).await;
    assert_eq!(requests.len(), 1);
    assert!(requests[0].get("tools").is_none());
    assert_eq!(requests[0]["messages"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn news_question_searches_the_web() {
    let search = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/html/"))
        .and(body_string_contains("q=rust+release"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><div class="results">
  <div class="result results_links web-result"><div class="result__body">
    <h2 class="result__title"><a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fblog.rust-lang.org%2F&amp;rut=1">Rust</a></h2>
    <a class="result__snippet" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fblog.rust-lang.org%2F">Rust 1.80 was released.</a>
  </div></div>
</div></body></html>"#,
        ))
        .expect(1)
        .mount(&search)
        .await;

    let model = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(tool_call("call_web", "web_search", json!({ "query": "rust release" })))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&model)
        .await;
    Mock::given(method("POST"))
        .respond_with(QuoteToolResult)
        .mount(&model)
        .await;

    let output = run_session(
        &format!("{}/v1", model.uri()),
        &format!("{}/html/", search.uri()),
        "latest rust news\n",
    )
    .await;

    assert!(output.contains("- Rust\n  https://blog.rust-lang.org/\n  Rust 1.80 was released."), "{output}");
}

#[tokio::test]
async fn unreachable_search_is_reported_to_the_model() {
    let model = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(tool_call("call_web", "web_search", json!({ "query": "stock price" })))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&model)
        .await;
    Mock::given(method("POST"))
        .respond_with(QuoteToolResult)
        .mount(&model)
        .await;

    let output = run_session(
        &format!("{}/v1", model.uri()),
        "http://127.0.0.1:9/",
        "stock price of ACME\n",
    )
    .await;

    assert!(output.contains("Tool `web_search` failed: web search is unavailable"), "{output}");
}

#[tokio::test]
async fn failed_turns_do_not_end_the_session() {
    let output = run_session(
        "http://127.0.0.1:9/v1",
        "http://127.0.0.1:9/",
        "first question\n\nsecond question\nEXIT\nnever asked\n",
    )
    .await;

    let failures = output.matches("I couldn't reach the model server").count();
    assert_eq!(failures, 2, "{output}");
    assert!(!output.contains("never asked"));
}
