use std::time::Duration;

use log::debug;
use reqwest::Url;
use reqwest::blocking::Client;

use super::error::FetchError;
use super::types::{SearchRequest, SearchResponse};
use crate::session::CancelToken;

pub const DEFAULT_BASE_URL: &str = "https://hn.algolia.com/api/v1";
pub const SEARCH_PATH: &str = "/search";
/// Page size sent with every request.
pub const HITS_PER_PAGE: u32 = 10;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of search result pages.
///
/// Implementations run on the fetch worker thread and must honour the token:
/// once it is cancelled they should return [`FetchError::Cancelled`] rather
/// than a result.
pub trait SearchBackend: Send + Sync {
	fn search(
		&self,
		request: &SearchRequest,
		cancel: &CancelToken,
	) -> Result<SearchResponse, FetchError>;
}

/// Connection settings for [`HnClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiOptions {
	pub base_url: String,
	pub timeout: Duration,
}

impl Default for ApiOptions {
	fn default() -> Self {
		Self {
			base_url: DEFAULT_BASE_URL.to_string(),
			timeout: DEFAULT_TIMEOUT,
		}
	}
}

/// Blocking HTTP client for the Hacker News search endpoint.
#[derive(Debug, Clone)]
pub struct HnClient {
	http: Client,
	base_url: String,
}

impl HnClient {
	pub fn new(options: &ApiOptions) -> Result<Self, FetchError> {
		let http = Client::builder()
			.timeout(options.timeout)
			.user_agent(concat!("hnsearch/", env!("CARGO_PKG_VERSION")))
			.build()?;
		Ok(Self {
			http,
			base_url: options.base_url.trim_end_matches('/').to_string(),
		})
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	/// Build the full request URL, encoding the query parameters.
	pub fn search_url(&self, request: &SearchRequest) -> Result<Url, FetchError> {
		let endpoint = format!("{}{}", self.base_url, SEARCH_PATH);
		Url::parse_with_params(
			&endpoint,
			&[
				("query", request.query.clone()),
				("page", request.page.to_string()),
				("hitsPerPage", request.hits_per_page.to_string()),
			],
		)
		.map_err(|err| FetchError::Transport(format!("invalid search url '{endpoint}': {err}")))
	}
}

impl SearchBackend for HnClient {
	fn search(
		&self,
		request: &SearchRequest,
		cancel: &CancelToken,
	) -> Result<SearchResponse, FetchError> {
		if cancel.is_cancelled() {
			return Err(FetchError::Cancelled);
		}

		let url = self.search_url(request)?;
		debug!("GET {url}");
		let response = self.http.get(url).send()?;

		if cancel.is_cancelled() {
			return Err(FetchError::Cancelled);
		}

		let status = response.status();
		if !status.is_success() {
			return Err(FetchError::Status {
				status: status.as_u16(),
			});
		}

		let body = response.text()?;
		Ok(serde_json::from_str(&body)?)
	}
}

#[cfg(test)]
mod tests {
	use std::io::{Read, Write};
	use std::net::{SocketAddr, TcpListener};
	use std::sync::mpsc;
	use std::thread::{self, JoinHandle};

	use super::*;

	fn request(query: &str, page: u32) -> SearchRequest {
		SearchRequest {
			query: query.to_string(),
			page,
			hits_per_page: HITS_PER_PAGE,
		}
	}

	fn http_response(status: u16, body: &str) -> String {
		format!(
			"HTTP/1.1 {} {}\r\n\
			 Content-Type: application/json\r\n\
			 Content-Length: {}\r\n\
			 Connection: close\r\n\
			 \r\n\
			 {}",
			status,
			match status {
				200 => "OK",
				404 => "Not Found",
				500 => "Internal Server Error",
				_ => "Unknown",
			},
			body.len(),
			body
		)
	}

	/// Serve one canned response and hand back the raw request line.
	fn start_test_server(status: u16, body: &str) -> (SocketAddr, JoinHandle<()>, mpsc::Receiver<String>) {
		let listener = TcpListener::bind("127.0.0.1:0").expect("bind to ephemeral port");
		let addr = listener.local_addr().expect("local addr");
		let response = http_response(status, body);
		let (tx, rx) = mpsc::channel();

		let handle = thread::spawn(move || {
			if let Ok((mut stream, _)) = listener.accept() {
				let mut buf = [0u8; 4096];
				let read = stream.read(&mut buf).unwrap_or(0);
				let head = String::from_utf8_lossy(&buf[..read]).to_string();
				let request_line = head.lines().next().unwrap_or_default().to_string();
				let _ = tx.send(request_line);
				let _ = stream.write_all(response.as_bytes());
				let _ = stream.flush();
			}
		});

		(addr, handle, rx)
	}

	fn client_for(addr: SocketAddr) -> HnClient {
		HnClient::new(&ApiOptions {
			base_url: format!("http://{addr}/api/v1/"),
			timeout: Duration::from_secs(5),
		})
		.expect("client")
	}

	#[test]
	fn search_url_encodes_parameters() {
		let client = HnClient::new(&ApiOptions::default()).expect("client");
		let url = client.search_url(&request("rust & c++", 3)).expect("url");
		assert_eq!(url.path(), "/api/v1/search");

		let pairs: Vec<(String, String)> = url
			.query_pairs()
			.map(|(k, v)| (k.into_owned(), v.into_owned()))
			.collect();
		assert_eq!(
			pairs,
			vec![
				("query".to_string(), "rust & c++".to_string()),
				("page".to_string(), "3".to_string()),
				("hitsPerPage".to_string(), "10".to_string()),
			]
		);
	}

	#[test]
	fn base_url_trailing_slash_is_trimmed() {
		let client = HnClient::new(&ApiOptions {
			base_url: "http://localhost:9000/api/".into(),
			timeout: DEFAULT_TIMEOUT,
		})
		.expect("client");
		assert_eq!(client.base_url(), "http://localhost:9000/api");
	}

	#[test]
	fn successful_response_is_decoded() {
		let body = r#"{"hits":[{"objectID":"1","title":"Redux","author":"dan","url":"https://r.js","num_comments":3,"points":10}],"page":0}"#;
		let (addr, handle, requests) = start_test_server(200, body);

		let response = client_for(addr)
			.search(&request("redux", 0), &CancelToken::new())
			.expect("search");
		handle.join().expect("server thread");

		assert_eq!(response.page, 0);
		assert_eq!(response.hits.len(), 1);
		assert_eq!(response.hits[0].object_id, "1");

		let request_line = requests.recv().expect("request line");
		assert!(request_line.starts_with("GET /api/v1/search?"));
		assert!(request_line.contains("query=redux"));
		assert!(request_line.contains("hitsPerPage=10"));
	}

	#[test]
	fn error_status_maps_to_status_variant() {
		let (addr, handle, _requests) = start_test_server(500, "{}");
		let err = client_for(addr)
			.search(&request("redux", 0), &CancelToken::new())
			.unwrap_err();
		handle.join().expect("server thread");
		assert_eq!(err, FetchError::Status { status: 500 });
	}

	#[test]
	fn malformed_body_maps_to_decode() {
		let (addr, handle, _requests) = start_test_server(200, "not json");
		let err = client_for(addr)
			.search(&request("redux", 0), &CancelToken::new())
			.unwrap_err();
		handle.join().expect("server thread");
		assert!(matches!(err, FetchError::Decode(_)), "got {err:?}");
	}

	#[test]
	fn unreachable_host_maps_to_transport() {
		let client = HnClient::new(&ApiOptions {
			base_url: "http://127.0.0.1:1".into(),
			timeout: Duration::from_secs(2),
		})
		.expect("client");
		let err = client
			.search(&request("redux", 0), &CancelToken::new())
			.unwrap_err();
		assert!(matches!(err, FetchError::Transport(_)), "got {err:?}");
	}

	#[test]
	fn cancelled_token_short_circuits_before_network() {
		let client = HnClient::new(&ApiOptions {
			base_url: "http://127.0.0.1:1".into(),
			timeout: Duration::from_secs(2),
		})
		.expect("client");
		let token = CancelToken::new();
		token.cancel();
		let err = client.search(&request("redux", 0), &token).unwrap_err();
		assert_eq!(err, FetchError::Cancelled);
	}
}
