use std::sync::Arc;

use aim_core::model::GroundingSource;
use aim_core::time::fixed_now;
use mockito::{Matcher, Server};
use services::tutor::{
    ERROR_REPLY_TEXT, GeminiConfig, GeminiTransport, TutorConversation, TutorService,
};
use services::Clock;

fn service_for(server: &Server) -> TutorService {
    let mut config = GeminiConfig::new("test-key");
    config.base_url = server.url();
    TutorService::new(
        Clock::fixed(fixed_now()),
        Some(Arc::new(GeminiTransport::new(config))),
    )
}

#[tokio::test]
async fn conversation_round_trip_with_grounding() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/models/gemini-2.5-flash:generateContent")
        .match_header("x-goog-api-key", "test-key")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "contents": [
                {"role": "model"},
                {"role": "user", "parts": [{"text": "Where is React Conf?"}]}
            ],
            "tools": [{"googleSearch": {}}, {"googleMaps": {}}]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"In Henderson, NV."}]},
                "groundingMetadata":{"groundingChunks":[
                    {"maps":{"uri":"https://maps.google.com/?cid=1","title":"Westin"}},
                    {"web":{"uri":"https://conf.react.dev"}}
                ]}}]}"#,
        )
        .create_async()
        .await;

    let service = service_for(&server);
    let mut convo = TutorConversation::new("Introduction to Hooks", fixed_now());
    let turn = convo
        .begin_user_turn("Where is React Conf?", fixed_now())
        .expect("turn");
    let reply = service
        .respond_message(&turn.history, &turn.context, &turn.message)
        .await;
    convo.finish_turn(reply);
    mock.assert_async().await;

    let messages = convo.messages();
    assert_eq!(messages.len(), 3);
    let answer = &messages[2];
    assert_eq!(answer.text, "In Henderson, NV.");
    assert_eq!(answer.grounding.len(), 2);
    assert_eq!(answer.grounding[0].source, GroundingSource::Map);
    assert_eq!(answer.grounding[0].title, "Westin");
    assert_eq!(answer.grounding[1].source, GroundingSource::Web);
    assert_eq!(answer.grounding[1].title, "Web Source");
    assert!(!convo.is_pending());
}

#[tokio::test]
async fn provider_error_yields_apology_without_citations() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", Matcher::Any)
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let reply = service_for(&server).respond(&[], "ctx", "hello").await;
    assert_eq!(reply.text, ERROR_REPLY_TEXT);
    assert!(reply.grounding.is_empty());
}
