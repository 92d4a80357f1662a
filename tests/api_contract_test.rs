/// API contract tests
///
/// Validates the wire formats this service depends on:
/// - Portfolio listing response (enveloped records)
/// - Stock predictions response (open row schema)
/// - Groq chat completion request/response shapes
///
/// NOTE: These tests validate request/response structures against recorded
/// payloads. Full integration tests against the live upstream require a
/// running portfolio backend.

use serde::Deserialize;
use serde_json::json;

// ---------------------------------------------------------------------------
// Upstream portfolio listing
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct PortfolioEnvelope {
    portfolio: PortfolioRecord,
}

#[derive(Debug, Deserialize)]
struct PortfolioRecord {
    portfolio_id: uuid::Uuid,
    name: String,
}

#[test]
fn portfolio_listing_parses_enveloped_records() {
    let body = json!([
        {
            "portfolio": {
                "portfolio_id": "f772dc7d-7b53-4bec-9929-7f9774be00ff",
                "name": "Growth",
                "created_at": "2024-06-01T09:30:00Z",
                "user_id": "11111111-2222-3333-4444-555555555555"
            },
            "shared": false
        },
        {
            "portfolio": {
                "portfolio_id": "0e6bfc3f-9a1c-4f6a-8f25-77a4a1f2a9c1",
                "name": "Income"
            }
        }
    ]);

    let portfolios: Vec<PortfolioEnvelope> = serde_json::from_value(body).unwrap();
    assert_eq!(portfolios.len(), 2);
    assert_eq!(portfolios[0].portfolio.name, "Growth");
    assert_ne!(
        portfolios[0].portfolio.portfolio_id,
        portfolios[1].portfolio.portfolio_id
    );
}

#[test]
fn portfolio_listing_accepts_empty_array() {
    let portfolios: Vec<PortfolioEnvelope> = serde_json::from_str("[]").unwrap();
    assert!(portfolios.is_empty());
}

// ---------------------------------------------------------------------------
// Upstream stock predictions
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct PredictionRecord {
    purchase_price: f64,
    current_price: f64,
    quantity: f64,
    #[serde(flatten)]
    extra: std::collections::BTreeMap<String, serde_json::Value>,
}

#[test]
fn prediction_rows_expose_required_fields_and_keep_the_rest() {
    let body = json!([
        {
            "prediction_id": "a37a77c8-6a33-4dbb-9f43-0a6f21929a10",
            "symbol": "AAPL",
            "purchase_price": 150.25,
            "current_price": 171.0,
            "quantity": 12,
            "predicted_price": 185.5,
            "model_confidence": 0.82
        }
    ]);

    let rows: Vec<PredictionRecord> = serde_json::from_value(body).unwrap();
    assert_eq!(rows[0].purchase_price, 150.25);
    assert_eq!(rows[0].current_price, 171.0);
    assert_eq!(rows[0].quantity, 12.0);
    assert_eq!(rows[0].extra.get("symbol"), Some(&json!("AAPL")));
    assert_eq!(rows[0].extra.get("model_confidence"), Some(&json!(0.82)));
}

#[test]
fn prediction_row_without_required_field_is_rejected() {
    let body = json!([{ "symbol": "AAPL", "purchase_price": 1.0, "quantity": 2 }]);
    let result: Result<Vec<PredictionRecord>, _> = serde_json::from_value(body);
    assert!(result.is_err());
}

// ---------------------------------------------------------------------------
// Groq chat completion
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: String,
}

#[test]
fn completion_response_parses_first_choice() {
    let body = json!({
        "id": "chatcmpl-abc123",
        "model": "llama-3.3-70b-versatile",
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": "Hi there!" }, "finish_reason": "stop" }
        ],
        "usage": { "prompt_tokens": 412, "completion_tokens": 9, "total_tokens": 421 }
    });

    let response: CompletionResponse = serde_json::from_value(body).unwrap();
    assert_eq!(response.choices[0].message.content, "Hi there!");
}

#[test]
fn completion_response_with_no_choices_is_detectable() {
    let body = json!({ "choices": [] });
    let response: CompletionResponse = serde_json::from_value(body).unwrap();
    assert!(response.choices.first().is_none());
}
