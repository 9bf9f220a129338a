//! Concurrent load through the gateway.

use std::time::Instant;

use futures_util::future::join_all;
use reqwest::header::ACCEPT;
use rr_gateway::http::StatusSnapshot;

mod common;

async fn total_requests(client: &reqwest::Client, url: &str) -> u64 {
    let snapshot: StatusSnapshot = client
        .get(url)
        .header(ACCEPT, "application/json")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    snapshot.total_requests
}

#[tokio::test]
async fn test_concurrent_requests_split_evenly() {
    let a = common::start_mock_backend("a").await;
    let b = common::start_mock_backend("b").await;
    let gateway = common::start_gateway(vec![a.url(), b.url()]).await;
    let client = common::client();

    let total = 200;
    let start = Instant::now();
    let responses = join_all((0..total).map(|i| {
        let client = client.clone();
        let url = gateway.url(&format!("/load/{i}"));
        async move { client.get(url).send().await }
    }))
    .await;

    let ok = responses
        .into_iter()
        .filter(|r| r.as_ref().map(|res| res.status().is_success()).unwrap_or(false))
        .count();
    println!("{total} requests in {:?}", start.elapsed());

    assert_eq!(ok, total);
    // Every request consumed exactly one ticket; tickets alternate a/b.
    assert_eq!(a.hits(), total / 2);
    assert_eq!(b.hits(), total / 2);
    assert_eq!(gateway.gateway.balancer().selections(), total as u64);
}

#[tokio::test]
async fn test_request_counter_tracks_concurrent_batch() {
    let a = common::start_mock_backend("a").await;
    let gateway = common::start_gateway(vec![a.url()]).await;
    let client = common::client();
    let ping = gateway.url("/ping");

    let before = total_requests(&client, &ping).await;

    let batch = 50;
    join_all((0..batch).map(|_| {
        let client = client.clone();
        let url = gateway.url("/");
        async move { client.get(url).send().await.unwrap() }
    }))
    .await;

    let after = total_requests(&client, &ping).await;

    // The second ping counts itself.
    assert_eq!(after - before, batch + 1);
    assert_eq!(gateway.gateway.requests_served(), after);
    assert_eq!(a.hits() as u64, batch);
}
