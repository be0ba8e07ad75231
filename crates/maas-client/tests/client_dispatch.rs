//! End-to-end dispatch tests against a mock MAAS server.
//!
//! These exercise status classification across the 2xx boundary and the
//! sharing of one client between many concurrent callers.

use maas_client::{Error, MaasClient, Params, PlainTextSigner, OAuthToken, MAAS_REALM};
use tokio::task::JoinSet;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "consumer:token-key:token-secret";

fn api_url(server: &MockServer) -> String {
    format!("{}/MAAS/api/2.0/", server.uri())
}

fn expected_authorization() -> String {
    let token = OAuthToken::from_api_key(API_KEY).unwrap();
    PlainTextSigner::new(token, MAAS_REALM)
        .unwrap()
        .authorization()
}

#[tokio::test]
async fn success_statuses_return_exact_body() {
    for status in [200u16, 201, 202, 203, 250, 299] {
        let server = MockServer::start().await;
        let body = format!("{{\"status\": {status}}}");
        Mock::given(method("GET"))
            .and(path("/MAAS/api/2.0/machines/"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body.clone()))
            .mount(&server)
            .await;

        let client = MaasClient::authenticated(api_url(&server), API_KEY).unwrap();
        let received = client
            .get("machines/", "", &Params::new())
            .await
            .unwrap_or_else(|err| panic!("status {status} failed: {err}"));
        assert_eq!(received, body.as_bytes(), "status {status}");
    }
}

#[tokio::test]
async fn error_statuses_return_body_alongside_error() {
    for status in [400u16, 401, 403, 404, 409, 500, 503] {
        let server = MockServer::start().await;
        let body = format!("{{\"error\": {status}}}");
        Mock::given(method("POST"))
            .and(path("/MAAS/api/2.0/machines/"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body.clone()))
            .mount(&server)
            .await;

        let client = MaasClient::authenticated(api_url(&server), API_KEY).unwrap();
        let err = client
            .post("machines/", "allocate", &Params::new())
            .await
            .unwrap_err();

        let Error::ApiError {
            status: code,
            status_line,
            body: received,
        } = &err
        else {
            panic!("status {status} produced {err:?}");
        };
        assert_eq!(*code, status);
        assert_eq!(received.as_slice(), body.as_bytes());
        assert!(status_line.starts_with(&status.to_string()));
        assert!(err.to_string().contains(status_line.as_str()));
    }
}

#[tokio::test]
async fn concurrent_calls_share_one_client() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/MAAS/api/2.0/machines/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(100)
        .mount(&server)
        .await;

    let client = MaasClient::authenticated(api_url(&server), API_KEY).unwrap();
    let mut tasks = JoinSet::new();
    for n in 0..100 {
        let client = client.clone();
        tasks.spawn(async move {
            client
                .get("machines/", "list", &Params::from([("n", n)]))
                .await
        });
    }

    while let Some(result) = tasks.join_next().await {
        assert_eq!(result.unwrap().unwrap(), b"[]");
    }

    let expected = expected_authorization();
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 100);

    let mut seen: Vec<u32> = requests
        .iter()
        .map(|request| {
            let authorization = request
                .headers
                .get("authorization")
                .and_then(|value| value.to_str().ok())
                .unwrap();
            assert_eq!(authorization, expected);

            let ops: Vec<String> = request
                .url
                .query_pairs()
                .filter(|(key, _)| key == "op")
                .map(|(_, value)| value.into_owned())
                .collect();
            assert_eq!(ops, ["list"]);

            request
                .url
                .query_pairs()
                .find(|(key, _)| key == "n")
                .and_then(|(_, value)| value.parse().ok())
                .unwrap()
        })
        .collect();
    seen.sort_unstable();
    assert_eq!(seen, (0..100).collect::<Vec<u32>>());
}

#[tokio::test]
async fn delete_distinguishes_no_content_from_forbidden() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/MAAS/api/2.0/machines/gone/"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/MAAS/api/2.0/machines/locked/"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = MaasClient::authenticated(api_url(&server), API_KEY).unwrap();
    assert!(client.delete("machines/gone/").await.is_ok());

    let err = client.delete("machines/locked/").await.unwrap_err();
    assert_eq!(err.status(), Some(403));
}

#[test]
fn api_keys_without_three_fields_are_rejected() {
    for key in ["", "abc", "a:b", "a:b:c:d", "::::"] {
        let result = MaasClient::authenticated("http://maas.local/MAAS/api/2.0/", key);
        assert!(
            matches!(result, Err(Error::InvalidArgument(_))),
            "key {key:?} was accepted"
        );
    }
}
