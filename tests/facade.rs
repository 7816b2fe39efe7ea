use httpmock::prelude::*;
use localic_client::{make_request, Chain, ResponseFormat};
use serde_json::json;

const CHAIN_ID: &str = "localjuno-1";

async fn bank_total_server() -> MockServer {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .header("content-type", "application/json")
                .json_body(json!({"chain_id": CHAIN_ID, "action": "query", "cmd": "bank total"}));
            then.status(200)
                .json_body(json!({"supply": [{"denom": "ujuno", "amount": "100"}]}));
        })
        .await;
    server
}

#[tokio::test]
async fn test_make_request_and_query_agree() {
    let server = bank_total_server().await;
    let chain = Chain::new(server.url("/"), CHAIN_ID).unwrap();

    let raw = chain
        .make_request("query", "bank total", ResponseFormat::Json)
        .await
        .unwrap();
    let via_query = chain.query("bank total", ResponseFormat::Json).await.unwrap();

    assert_eq!(raw, via_query);
    assert_eq!(
        raw.as_json().unwrap()["supply"][0],
        json!({"denom": "ujuno", "amount": "100"})
    );
}

#[tokio::test]
async fn test_free_function_matches_facade() {
    let server = bank_total_server().await;
    let client = reqwest::Client::new();

    let free = make_request(
        &client,
        &server.url("/"),
        CHAIN_ID,
        "query",
        "bank total",
        ResponseFormat::Json,
    )
    .await
    .unwrap();
    let chain = Chain::new(server.url("/"), CHAIN_ID).unwrap();

    assert_eq!(free, chain.query("bank total", ResponseFormat::Json).await.unwrap());
}
