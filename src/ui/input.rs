use ratatui::Frame;
use ratatui::crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use ratatui::style::Style;
use tui_textarea::{CursorMove, TextArea};

/// Single-line query editor.
pub struct SearchInput<'a> {
	textarea: TextArea<'a>,
}

impl<'a> SearchInput<'a> {
	pub fn new(initial: impl Into<String>) -> Self {
		let mut textarea = TextArea::new(vec![initial.into()]);
		textarea.set_cursor_line_style(Style::default());
		textarea.set_placeholder_text("search Hacker News");
		textarea.move_cursor(CursorMove::End);
		Self { textarea }
	}

	pub fn text(&self) -> &str {
		self.textarea
			.lines()
			.first()
			.map(String::as_str)
			.unwrap_or_default()
	}

	/// Forward a key to the editor. Returns whether the text changed.
	///
	/// Callers must intercept `Enter` first; the editor would otherwise start
	/// a second line.
	pub fn input(&mut self, key: KeyEvent) -> bool {
		self.textarea.input(key)
	}

	pub fn render_textarea(&self, frame: &mut Frame, area: Rect) {
		frame.render_widget(&self.textarea, area);
	}
}

#[cfg(test)]
mod tests {
	use ratatui::crossterm::event::{KeyCode, KeyModifiers};

	use super::*;

	fn key(code: KeyCode) -> KeyEvent {
		KeyEvent::new(code, KeyModifiers::NONE)
	}

	#[test]
	fn typing_appends_at_end_of_initial_text() {
		let mut input = SearchInput::new("red");
		assert!(input.input(key(KeyCode::Char('u'))));
		assert!(input.input(key(KeyCode::Char('x'))));
		assert_eq!(input.text(), "redux");
	}

	#[test]
	fn backspace_edits_and_cursor_moves_do_not() {
		let mut input = SearchInput::new("rust");
		assert!(!input.input(key(KeyCode::Left)));
		assert!(input.input(key(KeyCode::Backspace)));
		assert_eq!(input.text(), "rut");
	}

	#[test]
	fn empty_input_has_empty_text() {
		let input = SearchInput::new("");
		assert_eq!(input.text(), "");
	}
}
