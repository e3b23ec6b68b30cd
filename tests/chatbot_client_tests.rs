//! HTTP chatbot client against a wiremock stand-in for the canteen service.

use cantina_pdv::chatbot::http::HttpChatbotClient;
use cantina_pdv::chatbot::{ ChatbotClient, ChatbotConfig, ChatbotError };
use cantina_pdv::models::chatbot::{ PaymentMethod, Payload, TransactionKind };
use serde_json::json;
use wiremock::matchers::{ body_json, header, method, path };
use wiremock::{ Mock, MockServer, ResponseTemplate };

fn client_for(server: &MockServer) -> HttpChatbotClient {
    let config = ChatbotConfig {
        url: format!("{}/chatbot", server.uri()),
    };
    HttpChatbotClient::from_config(&config).expect("valid mock url")
}

#[tokio::test]
async fn posts_raw_text_and_decodes_sale() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chatbot"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "message": " salgado grande Ana pix " })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({
                "response": "Venda registrada",
                "transactionDetails": {
                    "type": "sale",
                    "studentName": "Ana",
                    "amount": 10,
                    "product": "Salgado grande",
                    "paymentMethod": "Pix"
                }
            }))
        )
        .expect(1)
        .mount(&server).await;

    let response = client_for(&server)
        .send_message(" salgado grande Ana pix ").await
        .expect("request should succeed");

    assert_eq!(response.response, "Venda registrada");
    assert!(response.has_transaction());
    let details = response.transaction_details.as_ref().and_then(Payload::typed).expect("typed details");
    assert_eq!(details.kind, TransactionKind::Sale);
    assert_eq!(details.payment_method, Some(PaymentMethod::Pix));
    assert_eq!(details.amount, Some(10.0));
}

#[tokio::test]
async fn plain_answer_has_no_transaction() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chatbot"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "response": "Saldo da Ana: R$ 25,00" }))
        )
        .mount(&server).await;

    let response = client_for(&server).send_message("saldo Ana").await.unwrap();

    assert_eq!(response.response, "Saldo da Ana: R$ 25,00");
    assert!(!response.has_transaction());
}

#[tokio::test]
async fn server_error_maps_to_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server).await;

    let err = client_for(&server).send_message("oi").await.unwrap_err();

    match err {
        ChatbotError::Status { status, body } => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn malformed_body_maps_to_decode() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server).await;

    let err = client_for(&server).send_message("oi").await.unwrap_err();
    assert!(matches!(err, ChatbotError::Decode(_)), "got {:?}", err);
}

#[tokio::test]
async fn body_without_response_field_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "oi" })))
        .mount(&server).await;

    let err = client_for(&server).send_message("oi").await.unwrap_err();
    assert!(matches!(err, ChatbotError::Decode(_)), "got {:?}", err);
}

#[tokio::test]
async fn unreachable_service_maps_to_request_error() {
    // Nothing listens on port 1.
    let config = ChatbotConfig { url: "http://127.0.0.1:1/chatbot".to_string() };
    let client = HttpChatbotClient::from_config(&config).unwrap();

    let err = client.send_message("oi").await.unwrap_err();
    assert!(matches!(err, ChatbotError::Request(_)), "got {:?}", err);
}
