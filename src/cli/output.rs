use anyhow::Result;
use hnsearch::{Item, ResultPage, SearchOutcome};
use serde_json::json;

fn item_json(item: &Item) -> serde_json::Value {
	json!({
		"objectID": item.object_id,
		"title": item.title,
		"author": item.author,
		"url": item.url,
		"num_comments": item.num_comments,
		"points": item.points,
	})
}

fn item_line(item: &Item) -> String {
	let url = item.url.as_deref().unwrap_or("-");
	format!(
		"{}\t{}\t{}\t{}\t{}",
		item.title, item.author, item.num_comments, item.points, url
	)
}

/// Print a plain-text representation of the search outcome.
pub(crate) fn print_plain(outcome: &SearchOutcome) {
	if !outcome.accepted {
		println!("Search cancelled (query: '{}')", outcome.query);
		return;
	}

	match &outcome.selection {
		Some(item) => println!("{}", item_line(item)),
		None => println!("No selection"),
	}
}

/// Format the search outcome as a JSON string.
pub(crate) fn format_outcome_json(outcome: &SearchOutcome) -> Result<String> {
	let selection = match &outcome.selection {
		Some(item) => item_json(item),
		None => serde_json::Value::Null,
	};

	let payload = json!({
		"accepted": outcome.accepted,
		"query": outcome.query,
		"selection": selection,
	});

	Ok(serde_json::to_string_pretty(&payload)?)
}

/// Print the JSON representation of the search outcome.
pub(crate) fn print_json(outcome: &SearchOutcome) -> Result<()> {
	println!("{}", format_outcome_json(outcome)?);
	Ok(())
}

/// Print fetched results one hit per line.
pub(crate) fn print_results_plain(query: &str, results: Option<&ResultPage>) {
	let Some(results) = results.filter(|page| !page.hits.is_empty()) else {
		println!("No results for '{query}'");
		return;
	};
	for item in &results.hits {
		println!("{}", item_line(item));
	}
}

pub(crate) fn format_results_json(query: &str, results: Option<&ResultPage>) -> Result<String> {
	let hits: Vec<serde_json::Value> = results
		.map(|page| page.hits.iter().map(item_json).collect())
		.unwrap_or_default();
	let payload = json!({
		"query": query,
		"page": results.map(|page| page.page),
		"hits": hits,
	});
	Ok(serde_json::to_string_pretty(&payload)?)
}

pub(crate) fn print_results_json(query: &str, results: Option<&ResultPage>) -> Result<()> {
	println!("{}", format_results_json(query, results)?);
	Ok(())
}
