use crate::helpers::spawn_app;

fn valid_body() -> serde_json::Value {
    serde_json::json!({
        "to": "ana@mpgrupo.pt",
        "subject": "Sale S-1042 approved",
        "html": "<p>The sale was approved.</p>",
    })
}

#[tokio::test]
async fn alert_email_returns_a_200_and_sends_the_email() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = app.post_alert_email(&valid_body()).await;

    // assert
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Response was not JSON.");
    assert_eq!(body["success"], true);
    assert_eq!(body["messageId"], "<1@recording.test>");

    let sent = app.email_client.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient, "ana@mpgrupo.pt");
    assert_eq!(sent[0].subject, "Sale S-1042 approved");
    assert_eq!(sent[0].html, "<p>The sale was approved.</p>");
}

#[tokio::test]
async fn requests_without_an_admin_token_are_rejected() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = app
        .api_client
        .post(&format!("{}/alert-email", &app.address))
        .json(&valid_body())
        .send()
        .await
        .expect("Failed to execute request.");

    // assert
    assert_eq!(401, response.status().as_u16());
    assert_eq!(
        r#"Bearer realm="crm-mailer""#,
        response.headers()["WWW-Authenticate"]
    );
    assert!(app.email_client.sent().is_empty());
}

#[tokio::test]
async fn requests_with_the_wrong_admin_token_are_rejected() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = app
        .api_client
        .post(&format!("{}/alert-email", &app.address))
        .bearer_auth("not-the-admin-token")
        .json(&valid_body())
        .send()
        .await
        .expect("Failed to execute request.");

    // assert
    assert_eq!(401, response.status().as_u16());
    assert!(app.email_client.sent().is_empty());
}

#[tokio::test]
async fn alert_email_returns_a_400_when_data_is_missing() {
    // arrange
    let app = spawn_app().await;
    let test_cases = vec![
        (
            serde_json::json!({"subject": "Hi", "html": "<p>hi</p>"}),
            "missing the recipient",
        ),
        (
            serde_json::json!({"to": "ana@mpgrupo.pt", "html": "<p>hi</p>"}),
            "missing the subject",
        ),
        (
            serde_json::json!({"to": "ana@mpgrupo.pt", "subject": "Hi", "html": "  "}),
            "blank html",
        ),
        (
            serde_json::json!({"to": "definitely-not-an-email", "subject": "Hi", "html": "<p>hi</p>"}),
            "invalid recipient",
        ),
    ];

    for (invalid_body, error_message) in test_cases {
        // act
        let response = app.post_alert_email(&invalid_body).await;

        // assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload was {}.",
            error_message
        );
    }
    assert!(app.email_client.sent().is_empty());
}

#[tokio::test]
async fn alert_email_returns_a_500_when_delivery_fails() {
    // arrange
    let app = spawn_app().await;
    app.email_client.reject("ana@mpgrupo.pt");

    // act
    let response = app.post_alert_email(&valid_body()).await;

    // assert
    assert_eq!(500, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Response was not JSON.");
    assert_eq!(body["error"], "SMTP RCPT TO failed: 550 no such user");
}
