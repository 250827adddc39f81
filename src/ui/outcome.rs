use crate::api::Item;

/// How the interactive session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
	/// `true` when the user picked a row, `false` when they quit.
	pub accepted: bool,
	/// The query text at exit.
	pub query: String,
	pub selection: Option<Item>,
}
