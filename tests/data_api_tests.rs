mod support;

use fillwatch::adapter::outbound::polymarket::{DataApiClient, DataApiConfig};
use fillwatch::application::fetch_all_positions;
use fillwatch::domain::Side;
use fillwatch::port::ActivityGateway;
use rust_decimal_macros::dec;

use support::config::ALICE;
use support::http::StubServer;

const ACTIVITY: &str = r#"[
  {"type": "TRADE", "side": "BUY", "size": "1500", "usdcSize": 900, "price": "0.6",
   "conditionId": "0xc1", "title": "Will it rain?", "slug": "rain", "eventSlug": "weather",
   "outcome": "Yes", "transactionHash": "0xt1", "timestamp": 1700000000},
  {"type": "TRADE", "side": "HOLD", "size": "1", "usdcSize": "1", "price": "1",
   "conditionId": "0xc1", "transactionHash": "0xt2"},
  {"type": "TRADE", "side": "SELL", "size": 10, "usdcSize": 4, "price": 0.4,
   "conditionId": "0xc2", "eventSlug": "weather", "outcome": "No", "transactionHash": ""}
]"#;

fn client(server: &StubServer) -> DataApiClient {
    DataApiClient::from_config(&DataApiConfig {
        base_url: format!("{}/", server.base_url),
        ..DataApiConfig::default()
    })
}

#[tokio::test]
async fn activity_is_requested_and_unusable_records_dropped() {
    let server = StubServer::start(|_| (200, ACTIVITY.to_string())).await;

    let records = client(&server).fetch_activity(ALICE).await.unwrap();

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.side, Side::Buy);
    assert_eq!(record.size, dec!(1500));
    assert_eq!(record.usdc_size, dec!(900));
    assert_eq!(record.event_slug, "weather");
    assert_eq!(record.transaction_hash, "0xt1");
    assert_eq!(
        server.targets(),
        vec![format!("/activity?user={ALICE}&type=TRADE")]
    );
}

#[tokio::test]
async fn server_error_surfaces_as_http_error() {
    let server = StubServer::start(|_| (500, "{}".to_string())).await;

    let result = client(&server).fetch_activity(ALICE).await;

    assert!(matches!(result, Err(fillwatch::error::Error::Http(_))));
}

#[tokio::test]
async fn positions_are_paged_over_http() {
    let server = StubServer::start(|request| {
        let count = if request.target.contains("offset=0") { 2 } else { 1 };
        let page: Vec<String> = (0..count)
            .map(|i| {
                format!(
                    r#"{{"conditionId": "0xc{i}", "eventSlug": "weather", "title": "Will it rain?",
                        "size": 100, "avgPrice": "0.5", "currentValue": 60, "outcome": "Yes"}}"#
                )
            })
            .collect();
        (200, format!("[{}]", page.join(",")))
    })
    .await;

    let positions = fetch_all_positions(&client(&server), ALICE, 2).await.unwrap();

    assert_eq!(positions.len(), 3);
    assert_eq!(positions[0].current_value, dec!(60));
    assert_eq!(
        server.targets(),
        vec![
            format!("/positions?user={ALICE}&limit=2&offset=0"),
            format!("/positions?user={ALICE}&limit=2&offset=2"),
        ]
    );
}

#[tokio::test]
async fn undecodable_record_does_not_hide_the_rest() {
    let body = r#"[
      {"type": "TRADE", "side": "BUY", "size": "10", "usdcSize": "6", "price": "0.6",
       "conditionId": "0xc1", "eventSlug": "weather", "outcome": "Yes", "transactionHash": "0xgood"},
      {"type": "TRADE", "side": "BUY", "size": "10", "usdcSize": "", "price": "0.6",
       "conditionId": "0xc1", "eventSlug": "weather", "outcome": "Yes", "transactionHash": "0xbad"}
    ]"#;
    let server = StubServer::start(move |_| (200, body.to_string())).await;

    let records = client(&server).fetch_activity(ALICE).await.unwrap();

    let hashes: Vec<&str> = records.iter().map(|r| r.transaction_hash.as_str()).collect();
    assert_eq!(hashes, vec!["0xgood"]);
}

#[tokio::test]
async fn non_array_body_is_an_error() {
    let server = StubServer::start(|_| (200, r#"{"error": "rate limited"}"#.to_string())).await;

    let result = client(&server).fetch_activity(ALICE).await;

    assert!(matches!(result, Err(fillwatch::error::Error::Http(_))));
}
