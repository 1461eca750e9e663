use super::*;
use crate::Difficulty;

fn candidate_body(text: &str) -> String {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

#[test]
fn test_url_joins_endpoint_and_model() {
    let mut config = GeminiConfig::new("key");
    config.endpoint = "http://localhost:9000/v1beta/".to_string();
    config.model = "gemini-test".to_string();
    assert_eq!(
        config.url(),
        "http://localhost:9000/v1beta/models/gemini-test:generateContent"
    );
}

#[test]
fn test_request_body_asks_for_json() {
    let request = AdviceRequest::new("fen", vec![], "e2e4", None, Difficulty::Hard);
    let body = GeminiAdvisor::request_body(&request);
    assert_eq!(
        body["generationConfig"]["responseMimeType"],
        "application/json"
    );
    assert_eq!(body["generationConfig"]["responseSchema"], response_schema());
    assert_eq!(body["contents"][0]["parts"][0]["text"], request.prompt());
}

#[test]
fn test_parse_candidate_text() {
    let body = candidate_body(
        r#"{"text":"Develop.","bestMoveSan":"Nf3","strategicExplanation":"Knights before bishops.","isCheckmateSequence":false,"fromSquare":"g1","toSquare":"f3"}"#,
    );
    let advice = parse_generate_response(&body).unwrap();
    assert_eq!(advice.best_move_san, "Nf3");
    assert_eq!(advice.highlight.unwrap().to, "f3");
}

#[test]
fn test_empty_candidates() {
    assert!(matches!(
        parse_generate_response(r#"{"candidates":[]}"#),
        Err(AdviceError::NoCandidates)
    ));
    assert!(matches!(
        parse_generate_response(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#),
        Err(AdviceError::NoCandidates)
    ));
}

#[test]
fn test_candidate_violating_schema() {
    let body = candidate_body(r#"{"text":"only text"}"#);
    assert!(matches!(
        parse_generate_response(&body),
        Err(AdviceError::Schema(_))
    ));
}
