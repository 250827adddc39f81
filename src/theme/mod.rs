//! Colour themes for the terminal interface.

mod builtins;
mod types;

pub use builtins::{LIGHT, SLATE, SOLARIZED};
pub use types::{Theme, ThemeDefinition};

use builtins::{BUILT_IN_DEFINITIONS, DEFAULT_NAME};

/// Return the theme used when none is configured.
#[must_use]
pub fn default_theme() -> Theme {
	SLATE
}

/// Lookup a theme by case-insensitive name or alias.
#[must_use]
pub fn by_name(name: &str) -> Option<Theme> {
	let name = name.trim();
	BUILT_IN_DEFINITIONS
		.iter()
		.find(|definition| definition.answers_to(name))
		.map(|definition| definition.theme)
}

/// Return the canonical theme names, default first.
#[must_use]
pub fn names() -> Vec<&'static str> {
	let mut names: Vec<&'static str> = BUILT_IN_DEFINITIONS
		.iter()
		.map(|definition| definition.name)
		.collect();
	names.sort_unstable_by_key(|name| (*name != DEFAULT_NAME, *name));
	names
}

impl Default for Theme {
	fn default() -> Self {
		default_theme()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn lookup_is_case_insensitive_and_accepts_aliases() {
		assert_eq!(by_name("Solarized"), Some(SOLARIZED));
		assert_eq!(by_name(" dark "), Some(SLATE));
		assert_eq!(by_name("day"), Some(LIGHT));
		assert_eq!(by_name("neon"), None);
	}

	#[test]
	fn names_list_default_first() {
		assert_eq!(names(), vec!["slate", "light", "solarized"]);
	}
}
