use serde::{Deserialize, Deserializer, Serialize};

/// One search hit as returned by the Hacker News search API.
///
/// The API leaves several fields `null` for some record kinds (comments have
/// no title, Ask HN posts have no url, older stories have no comment count),
/// so those fields decode to their default instead of failing the whole page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
	#[serde(rename = "objectID")]
	pub object_id: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub title: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub author: String,
	#[serde(default)]
	pub url: Option<String>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub num_comments: u64,
	#[serde(default, deserialize_with = "null_as_default")]
	pub points: u64,
}

impl Item {
	/// Build an item with only its identifier and title populated.
	pub fn new(object_id: impl Into<String>, title: impl Into<String>) -> Self {
		Self {
			object_id: object_id.into(),
			title: title.into(),
			..Self::default()
		}
	}
}

/// A single page of hits for one query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
	pub hits: Vec<Item>,
	#[serde(default)]
	pub page: u32,
	#[serde(default, rename = "nbHits", skip_serializing_if = "Option::is_none")]
	pub total_hits: Option<u64>,
	#[serde(default, rename = "nbPages", skip_serializing_if = "Option::is_none")]
	pub total_pages: Option<u32>,
}

impl SearchResponse {
	pub fn new(hits: Vec<Item>, page: u32) -> Self {
		Self {
			hits,
			page,
			total_hits: None,
			total_pages: None,
		}
	}
}

/// Parameters for a single page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
	pub query: String,
	pub page: u32,
	pub hits_per_page: u32,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
