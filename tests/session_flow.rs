//! Drives a search session through the real HTTP client against a local server.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use hnsearch::{ApiOptions, FetchError, HnClient, SearchSession, SessionStatus};

const TIMEOUT: Duration = Duration::from_secs(5);

fn page_body(query: &str, page: u32) -> String {
	format!(
		r#"{{"hits":[{{"objectID":"{query}-{page}-a","title":"{query} {page} a","author":"pg","url":null,"num_comments":1,"points":2}},{{"objectID":"{query}-{page}-b","title":null,"author":"tptacek","url":"https://example.com","num_comments":null,"points":5}}],"page":{page},"nbHits":40,"nbPages":4}}"#
	)
}

fn respond(status: u16, body: &str) -> String {
	let reason = if status == 200 { "OK" } else { "Service Unavailable" };
	format!(
		"HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
		body.len()
	)
}

/// Answer `connections` requests, echoing the query and page back as hits.
///
/// Queries named `broken` get a 503.
fn start_server(connections: usize) -> (SocketAddr, mpsc::Receiver<String>) {
	let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
	let addr = listener.local_addr().expect("addr");
	let (tx, rx) = mpsc::channel();

	thread::spawn(move || {
		for _ in 0..connections {
			let Ok((mut stream, _)) = listener.accept() else {
				return;
			};
			let mut buf = [0u8; 4096];
			let read = stream.read(&mut buf).unwrap_or(0);
			let head = String::from_utf8_lossy(&buf[..read]).to_string();
			let target = head
				.lines()
				.next()
				.and_then(|line| line.split_whitespace().nth(1))
				.unwrap_or_default()
				.to_string();
			let _ = tx.send(target.clone());

			let url = reqwest::Url::parse(&format!("http://localhost{target}")).expect("target");
			let mut query = String::new();
			let mut page = 0;
			for (key, value) in url.query_pairs() {
				match key.as_ref() {
					"query" => query = value.into_owned(),
					"page" => page = value.parse().unwrap_or(0),
					_ => {}
				}
			}

			let response = if query == "broken" {
				respond(503, "{}")
			} else {
				respond(200, &page_body(&query, page))
			};
			let _ = stream.write_all(response.as_bytes());
			let _ = stream.flush();
		}
	});

	(addr, rx)
}

fn session_for(addr: SocketAddr, query: &str) -> SearchSession {
	let client = HnClient::new(&ApiOptions {
		base_url: format!("http://{addr}/api/v1"),
		timeout: TIMEOUT,
	})
	.expect("client");
	SearchSession::with_query(Arc::new(client), query)
}

#[test]
fn initial_search_then_load_more_accumulates_pages() {
	let (addr, requests) = start_server(2);
	let mut session = session_for(addr, "redux");

	session.initialize();
	assert!(session.settle(TIMEOUT));
	assert_eq!(session.hits().len(), 2);
	assert_eq!(session.hits()[1].title, "");
	assert_eq!(session.hits()[1].num_comments, 0);

	session.load_more();
	assert!(session.settle(TIMEOUT));
	assert_eq!(session.current_page(), 1);
	let ids: Vec<&str> = session.hits().iter().map(|hit| hit.object_id.as_str()).collect();
	assert_eq!(ids, vec!["redux-0-a", "redux-0-b", "redux-1-a", "redux-1-b"]);

	let first = requests.recv_timeout(TIMEOUT).expect("first request");
	assert!(first.starts_with("/api/v1/search?"));
	assert!(first.contains("query=redux"));
	assert!(first.contains("page=0"));
	assert!(first.contains("hitsPerPage=10"));
	let second = requests.recv_timeout(TIMEOUT).expect("second request");
	assert!(second.contains("page=1"));
}

#[test]
fn returning_to_a_cached_query_skips_the_network() {
	let (addr, requests) = start_server(2);
	let mut session = session_for(addr, "redux");

	session.initialize();
	assert!(session.settle(TIMEOUT));

	session.change_query_text("rust");
	assert!(session.submit().is_some());
	assert!(session.settle(TIMEOUT));
	assert_eq!(session.hits()[0].object_id, "rust-0-a");

	session.change_query_text("redux");
	assert!(session.submit().is_none());
	assert_eq!(session.status(), SessionStatus::Idle);
	assert_eq!(session.hits()[0].object_id, "redux-0-a");
	assert_eq!(session.store().len(), 2);

	assert_eq!(requests.iter().take(2).count(), 2);
	assert!(requests.recv_timeout(Duration::from_millis(100)).is_err());
}

#[test]
fn server_error_surfaces_and_can_be_dismissed() {
	let (addr, _requests) = start_server(2);
	let mut session = session_for(addr, "broken");

	session.initialize();
	assert!(session.settle(TIMEOUT));
	assert_eq!(session.error(), Some(&FetchError::Status { status: 503 }));
	assert_eq!(session.status(), SessionStatus::Failed);
	assert!(session.load_more().is_none());

	assert!(session.clear_error());
	session.change_query_text("ok");
	assert!(session.submit().is_some());
	assert!(session.settle(TIMEOUT));
	assert_eq!(session.status(), SessionStatus::Idle);
	assert_eq!(session.hits().len(), 2);
}

#[test]
fn dismiss_hides_only_the_chosen_hit() {
	let (addr, _requests) = start_server(1);
	let mut session = session_for(addr, "redux");

	session.initialize();
	assert!(session.settle(TIMEOUT));
	assert!(session.dismiss("redux-0-a"));
	assert!(!session.dismiss("redux-0-a"));
	let ids: Vec<&str> = session.hits().iter().map(|hit| hit.object_id.as_str()).collect();
	assert_eq!(ids, vec!["redux-0-b"]);
}

#[test]
fn teardown_stops_further_requests() {
	let (addr, _requests) = start_server(1);
	let mut session = session_for(addr, "redux");

	session.teardown();
	assert!(session.is_torn_down());
	assert!(session.initialize().is_none());
	assert!(session.fetch_page("redux", 0).is_none());
	assert!(session.hits().is_empty());
}
