use skin_analysis_gateway::{
    ai::{InferenceClient, MockRoutineClient},
    gateway::top_prediction,
    models::{AnalysisOutcome, FailureKind, Prediction},
    recommendations::parse_recommendations,
    report, Gateway, GatewayServices,
};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const IMAGE: &str = "data:image/jpeg;base64,/9j/4AAQSkZJRg==";

fn gateway_for(server: &MockServer) -> Gateway {
    Gateway::with_services(GatewayServices {
        inference: Box::new(InferenceClient::new(Some(format!("{}/predict", server.uri())))),
        routine: None,
    })
}

async fn mount_predictions(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_json(serde_json::json!({ "photoDataUri": IMAGE })))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_success_returns_predictions_exactly() {
    let server = MockServer::start().await;
    mount_predictions(
        &server,
        serde_json::json!({ "predictions": [{ "condition": "acne", "probability": 0.82 }] }),
    )
    .await;

    let outcome = gateway_for(&server).analyze(IMAGE).await;

    assert_eq!(
        outcome,
        AnalysisOutcome::Success(skin_analysis_gateway::models::AnalysisSuccess {
            predictions: vec![Prediction {
                condition: "acne".to_string(),
                probability: 0.82,
            }],
            recommendations: String::new(),
        })
    );
    assert_eq!(
        serde_json::to_value(&outcome).unwrap(),
        serde_json::json!({
            "predictions": [{ "condition": "acne", "probability": 0.82 }],
            "recommendations": ""
        })
    );
}

#[tokio::test]
async fn test_empty_input_never_calls_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = gateway_for(&server).analyze("").await;

    assert_eq!(
        serde_json::to_value(&outcome).unwrap(),
        serde_json::json!({ "error": "No image data provided." })
    );
}

#[tokio::test]
async fn test_server_error_is_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Failed to process image."))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = gateway_for(&server).analyze(IMAGE).await;

    let failure = outcome.failure().unwrap();
    assert_eq!(failure.kind, FailureKind::Transport);
    assert!(failure.error.contains("Could not connect"));
}

#[tokio::test]
async fn test_empty_prediction_list_is_no_conditions_failure() {
    let server = MockServer::start().await;
    mount_predictions(&server, serde_json::json!({ "predictions": [] })).await;

    let outcome = gateway_for(&server).analyze(IMAGE).await;

    let failure = outcome.failure().unwrap();
    assert_eq!(failure.kind, FailureKind::Format);
    assert!(failure.error.contains("unable to identify any conditions"));
}

#[tokio::test]
async fn test_invalid_shape_is_format_failure_not_transport() {
    let server = MockServer::start().await;
    mount_predictions(
        &server,
        serde_json::json!({ "predictions": [{ "label": "acne", "score": 0.82 }] }),
    )
    .await;

    let outcome = gateway_for(&server).analyze(IMAGE).await;

    let failure = outcome.failure().unwrap();
    assert_eq!(failure.kind, FailureKind::Format);
    assert!(failure.error.contains("invalid data format"));
}

#[tokio::test]
async fn test_top_condition_is_max_probability() {
    let server = MockServer::start().await;
    mount_predictions(
        &server,
        serde_json::json!({ "predictions": [
            { "condition": "mel", "probability": 0.9 },
            { "condition": "nv", "probability": 0.4 }
        ] }),
    )
    .await;

    let outcome = gateway_for(&server).analyze(IMAGE).await;

    let success = outcome.success().unwrap();
    assert_eq!(top_prediction(&success.predictions).unwrap().condition, "mel");
}

#[tokio::test]
async fn test_routine_is_generated_for_top_condition() {
    let server = MockServer::start().await;
    mount_predictions(
        &server,
        serde_json::json!({ "predictions": [
            { "condition": "nv", "probability": 0.4 },
            { "condition": "mel", "probability": 0.9 }
        ] }),
    )
    .await;

    let gateway = Gateway::with_services(GatewayServices {
        inference: Box::new(InferenceClient::new(Some(format!("{}/predict", server.uri())))),
        routine: Some(Box::new(MockRoutineClient::new().with_routine_response(
            "Natural Remedies:\nUse aloe.\nConventional Treatments:\nSee a doctor.".to_string(),
        ))),
    });

    let outcome = gateway.analyze(IMAGE).await;

    let success = outcome.success().unwrap();
    let sections = parse_recommendations(&success.recommendations);
    let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Natural Remedies:", "Conventional Treatments:"]);
    assert_eq!(sections[0].content, "Use aloe.");
    assert_eq!(sections[1].content, "See a doctor.");

    let text = report::render(&outcome);
    assert!(text.starts_with("Condition Analysis\n* mel"));
}

#[tokio::test]
async fn test_missing_endpoint_fails_each_request_only() {
    let gateway = Gateway::with_services(GatewayServices {
        inference: Box::new(InferenceClient::new(None)),
        routine: None,
    });

    for _ in 0..2 {
        let outcome = gateway.analyze(IMAGE).await;
        assert_eq!(outcome.failure().unwrap().kind, FailureKind::Config);
    }
}
