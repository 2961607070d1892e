use httpmock::prelude::*;
use mailosaur_client::{
    Client, DeviceCreateOptions, Error, MessageCreateOptions, MessageForwardOptions,
    MessageListOptions, MessageReplyOptions, PreviewRequestOptions, Server, ServerCreateOptions,
};
use serde_json::json;
use std::time::Duration;

fn client_for(server: &MockServer) -> Client {
    Client::builder()
        .api_key("test-key")
        .base_url(server.base_url())
        .build()
        .unwrap()
}

#[tokio::test]
async fn requests_identify_the_client() {
    let server = MockServer::start_async().await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/servers")
                .header("authorization", "Basic dGVzdC1rZXk6")
                .header(
                    "user-agent",
                    concat!("mailosaur-client/", env!("CARGO_PKG_VERSION")),
                );
            then.status(200).json_body(json!({
                "items": [{ "id": "srv1", "name": "Tests", "users": [], "messages": 3 }]
            }));
        })
        .await;

    let servers = client_for(&server).list_servers().await.unwrap();

    assert_eq!(servers.items.len(), 1);
    assert_eq!(servers.items[0].messages, Some(3));
    list.assert_hits_async(1).await;
}

#[tokio::test]
async fn server_lifecycle() {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/servers")
                .json_body(json!({ "name": "Tests" }));
            then.status(200)
                .json_body(json!({ "id": "srv1", "name": "Tests" }));
        })
        .await;
    let password = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/servers/srv1/password");
            then.status(200).json_body(json!({ "value": "s3cret" }));
        })
        .await;
    let update = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/api/servers/srv1")
                .json_body(json!({ "id": "srv1", "name": "Renamed", "users": [] }));
            then.status(200)
                .json_body(json!({ "id": "srv1", "name": "Renamed" }));
        })
        .await;
    let delete = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/api/servers/srv1");
            then.status(204);
        })
        .await;

    let client = client_for(&server);
    let created = client
        .create_server(&ServerCreateOptions {
            name: Some("Tests".into()),
        })
        .await
        .unwrap();
    assert_eq!(created.id.as_deref(), Some("srv1"));

    assert_eq!(client.get_server_password("srv1").await.unwrap(), "s3cret");

    let renamed = client
        .update_server(
            "srv1",
            &Server {
                name: Some("Renamed".into()),
                ..created
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name.as_deref(), Some("Renamed"));

    client.delete_server("srv1").await.unwrap();

    create.assert_hits_async(1).await;
    password.assert_hits_async(1).await;
    update.assert_hits_async(1).await;
    delete.assert_hits_async(1).await;
}

#[tokio::test]
async fn list_and_create_messages_target_a_server() {
    let server = MockServer::start_async().await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/messages")
                .query_param("server", "srv1")
                .query_param("itemsPerPage", "5");
            then.status(200)
                .json_body(json!({ "items": [{ "id": "m1" }, { "id": "m2" }] }));
        })
        .await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/messages")
                .query_param("server", "srv1")
                .json_body(json!({ "to": "you@example.com", "send": true, "subject": "Hi" }));
            then.status(200)
                .json_body(json!({ "id": "m3", "type": "Email", "subject": "Hi" }));
        })
        .await;
    let purge = server
        .mock_async(|when, then| {
            when.method(DELETE)
                .path("/api/messages")
                .query_param("server", "srv1");
            then.status(204);
        })
        .await;

    let client = client_for(&server);
    let page = client
        .list_messages(
            "srv1",
            &MessageListOptions {
                items_per_page: Some(5),
                ..MessageListOptions::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(page.items.len(), 2);

    let sent = client
        .create_message(
            "srv1",
            &MessageCreateOptions {
                to: Some("you@example.com".into()),
                send: Some(true),
                subject: Some("Hi".into()),
                ..MessageCreateOptions::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(sent.id.as_deref(), Some("m3"));

    client.delete_all_messages("srv1").await.unwrap();

    list.assert_hits_async(1).await;
    create.assert_hits_async(1).await;
    purge.assert_hits_async(1).await;
}

#[tokio::test]
async fn invalid_parameters_are_described() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/servers");
            then.status(400).json_body(json!({
                "errors": [{ "field": "name", "detail": [{ "description": "Name is required" }] }]
            }));
        })
        .await;

    let err = client_for(&server)
        .create_server(&ServerCreateOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert_eq!(err.to_string(), "(name) Name is required\r\n");
}

#[tokio::test]
async fn status_codes_map_to_messages() {
    let server = MockServer::start_async().await;
    for (id, status) in [("forbidden", 403), ("missing", 404), ("broken", 500)] {
        server
            .mock_async(|when, then| {
                when.method(GET).path(format!("/api/messages/{id}"));
                then.status(status);
            })
            .await;
    }

    let client = client_for(&server);
    let message = |id: &'static str| {
        let client = client.clone();
        async move { client.get_message_by_id(id).await.unwrap_err().to_string() }
    };

    assert_eq!(
        message("forbidden").await,
        "Insufficient permission to perform that task."
    );
    assert_eq!(message("missing").await, "Not found, check input parameters.");
    assert_eq!(
        message("broken").await,
        "An API error occurred, see httpResponse for further information."
    );
}

#[tokio::test]
async fn device_otp_by_id_or_secret() {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/devices").json_body(json!({
                "name": "My test",
                "sharedSecret": "ONSWG4TFOQYTEMY="
            }));
            then.status(200)
                .json_body(json!({ "id": "4a0b5c9e-6d1f", "name": "My test" }));
        })
        .await;
    let by_id = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/devices/4a0b5c9e-6d1f/otp");
            then.status(200).json_body(json!({ "code": "123456" }));
        })
        .await;
    let by_secret = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/devices/otp")
                .json_body(json!({ "sharedSecret": "ONSWG4TFOQYTEMY=" }));
            then.status(200).json_body(json!({ "code": "654321" }));
        })
        .await;

    let client = client_for(&server);
    let device = client
        .create_device(&DeviceCreateOptions {
            name: Some("My test".into()),
            shared_secret: Some("ONSWG4TFOQYTEMY=".into()),
        })
        .await
        .unwrap();
    let device_id = device.id.unwrap();

    let otp = client.get_device_otp(&device_id).await.unwrap();
    assert_eq!(otp.code.as_deref(), Some("123456"));

    let otp = client.get_device_otp("ONSWG4TFOQYTEMY=").await.unwrap();
    assert_eq!(otp.code.as_deref(), Some("654321"));

    create.assert_hits_async(1).await;
    by_id.assert_hits_async(1).await;
    by_secret.assert_hits_async(1).await;
}

#[tokio::test]
async fn downloads_return_raw_content() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/files/attachments/a1");
            then.status(200).body([0x89u8, b'P', b'N', b'G']);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/files/email/m1");
            then.status(200).body("Subject: Hi\r\n\r\nHello");
        })
        .await;

    let client = client_for(&server);
    assert_eq!(
        client.download_attachment("a1").await.unwrap(),
        vec![0x89, b'P', b'N', b'G']
    );
    assert!(
        client
            .download_message("m1")
            .await
            .unwrap()
            .starts_with("Subject: Hi")
    );
}

#[tokio::test]
async fn analysis_and_usage() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/analysis/spam/m1");
            then.status(200).json_body(json!({
                "score": 0.5,
                "spamFilterResults": { "spamAssassin": [{ "rule": "HTML_MESSAGE", "score": 0.5 }] }
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/analysis/deliverability/m1");
            then.status(200).json_body(json!({
                "spf": { "result": "Pass" },
                "dkim": [{ "result": "Fail", "tags": { "d": "example.com" } }],
                "blockLists": [{ "id": "spamhaus", "name": "Spamhaus", "result": "Pass" }]
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/usage/limits");
            then.status(200)
                .json_body(json!({ "email": { "limit": 100, "current": 7 } }));
        })
        .await;

    let client = client_for(&server);
    let spam = client.get_spam_analysis("m1").await.unwrap();
    assert_eq!(spam.score, Some(0.5));
    assert_eq!(spam.spam_filter_results.unwrap().spam_assassin.len(), 1);

    let report = client.get_deliverability_report("m1").await.unwrap();
    assert_eq!(report.dkim[0].tags["d"], "example.com");
    assert_eq!(report.block_lists[0].name, "Spamhaus");

    let limits = client.get_usage_limits().await.unwrap();
    assert_eq!(limits.email.unwrap().current, Some(7));
}

#[tokio::test]
async fn preview_download_and_generation() {
    let server = MockServer::start_async().await;
    let generate = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/messages/m1/screenshots")
                .json_body(json!({ "emailClients": ["iphone-16"] }));
            then.status(200)
                .json_body(json!({ "items": [{ "id": "p1", "emailClient": "iphone-16" }] }));
        })
        .await;
    let download = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/files/screenshots/p1");
            then.status(200).body([1u8, 2, 3]);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/files/screenshots/odd");
            then.status(204);
        })
        .await;

    let client = client_for(&server);
    let previews = client
        .generate_email_previews(
            "m1",
            &PreviewRequestOptions {
                email_clients: vec!["iphone-16".into()],
            },
        )
        .await
        .unwrap();
    let preview_id = previews.items[0].id.clone().unwrap();

    assert_eq!(client.download_preview(&preview_id).await.unwrap(), vec![1, 2, 3]);

    let err = client.download_preview("odd").await.unwrap_err();
    assert!(matches!(err, Error::PreviewStatus(204)));

    generate.assert_hits_async(1).await;
    download.assert_hits_async(1).await;
}

#[tokio::test]
async fn preview_download_retries_while_rendering() {
    let server = MockServer::start_async().await;
    let mut rendering = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/files/screenshots/p2");
            then.status(202).header("x-ms-delay", "300");
        })
        .await;

    let client = client_for(&server);
    let download = tokio::spawn(async move { client.download_preview("p2").await });

    while rendering.hits_async().await == 0 {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    let pending_hits = rendering.hits_async().await;
    rendering.delete_async().await;
    let ready = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/files/screenshots/p2");
            then.status(200).body([7u8, 8, 9]);
        })
        .await;

    assert_eq!(download.await.unwrap().unwrap(), vec![7, 8, 9]);
    assert!(pending_hits >= 1);
    ready.assert_hits_async(1).await;
}

#[test]
fn missing_api_key_fails_before_any_request() {
    let err = Client::builder()
        .base_url("http://127.0.0.1:1")
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
}

#[tokio::test]
async fn message_actions_by_id() {
    let server = MockServer::start_async().await;
    let forward = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/messages/m1/forward")
                .json_body(json!({ "to": "qa@example.com", "text": "FYI" }));
            then.status(200).json_body(json!({ "id": "m2", "type": "Email" }));
        })
        .await;
    let reply = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/messages/m1/reply")
                .json_body(json!({ "text": "Thanks" }));
            then.status(200).json_body(json!({ "id": "m3", "type": "Email" }));
        })
        .await;
    let delete = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/api/messages/m1");
            then.status(204);
        })
        .await;

    let client = client_for(&server);
    let forwarded = client
        .forward_message(
            "m1",
            &MessageForwardOptions {
                to: "qa@example.com".into(),
                text: Some("FYI".into()),
                ..MessageForwardOptions::default()
            },
        )
        .await
        .unwrap();
    let replied = client
        .reply_to_message(
            "m1",
            &MessageReplyOptions {
                text: Some("Thanks".into()),
                ..MessageReplyOptions::default()
            },
        )
        .await
        .unwrap();
    client.delete_message("m1").await.unwrap();

    assert_eq!(forwarded.id.as_deref(), Some("m2"));
    assert_eq!(replied.id.as_deref(), Some("m3"));
    forward.assert_hits_async(1).await;
    reply.assert_hits_async(1).await;
    delete.assert_hits_async(1).await;
}

#[tokio::test]
async fn listing_endpoints() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/servers/srv1");
            then.status(200)
                .json_body(json!({ "id": "srv1", "name": "Tests", "users": ["u1"] }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/devices");
            then.status(200)
                .json_body(json!({ "items": [{ "id": "d-1", "name": "Phone" }] }));
        })
        .await;
    let delete_device = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/api/devices/d-1");
            then.status(204);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/usage/transactions");
            then.status(200).json_body(json!({
                "items": [{ "timestamp": "2024-05-01T00:00:00Z", "email": 12, "sms": 1 }]
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/screenshots/clients");
            then.status(200).json_body(json!({
                "items": [{ "label": "iphone-16", "name": "iPhone 16" }]
            }));
        })
        .await;

    let client = client_for(&server);

    let srv = client.get_server("srv1").await.unwrap();
    assert_eq!(srv.users, vec!["u1".to_string()]);

    let devices = client.list_devices().await.unwrap();
    assert_eq!(devices.items[0].name.as_deref(), Some("Phone"));
    client.delete_device("d-1").await.unwrap();
    delete_device.assert_hits_async(1).await;

    let usage = client.get_usage_transactions().await.unwrap();
    assert_eq!(usage.items[0].email, Some(12));
    assert!(usage.items[0].timestamp.is_some());

    let clients = client.list_preview_email_clients().await.unwrap();
    assert_eq!(clients.items[0].label.as_deref(), Some("iphone-16"));
}
