//! Terminal presentation of a search session.

mod app;
mod input;
mod outcome;
mod render;
mod table;

pub use app::App;
pub use input::SearchInput;
pub use outcome::SearchOutcome;

use anyhow::Result;

use crate::session::SearchSession;
use crate::theme::Theme;

/// Run the interactive interface for `session` until the user exits.
pub fn run(session: SearchSession, theme: Theme) -> Result<SearchOutcome> {
	let mut app = App::new(session).with_theme(theme);
	app.run()
}
