use std::time::Duration;

use anyhow::Result;
use log::debug;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::widgets::TableState;
use throbber_widgets_tui::ThrobberState;

use super::input::SearchInput;
use super::outcome::SearchOutcome;
use crate::api::Item;
use crate::logging;
use crate::session::{SearchSession, SessionStatus};
use crate::theme::Theme;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Interactive terminal front-end over a [`SearchSession`].
pub struct App<'a> {
	pub(super) session: SearchSession,
	pub(super) search_input: SearchInput<'a>,
	pub(super) table_state: TableState,
	pub(super) theme: Theme,
	pub(super) throbber_state: ThrobberState,
	pub(super) show_logs: bool,
}

impl<'a> App<'a> {
	pub fn new(session: SearchSession) -> Self {
		let search_input = SearchInput::new(session.query_text());
		let mut table_state = TableState::default();
		table_state.select(Some(0));
		Self {
			session,
			search_input,
			table_state,
			theme: Theme::default(),
			throbber_state: ThrobberState::default(),
			show_logs: false,
		}
	}

	#[must_use]
	pub fn with_theme(mut self, theme: Theme) -> Self {
		self.theme = theme;
		self
	}

	pub fn session(&self) -> &SearchSession {
		&self.session
	}

	/// Run the interface until the user quits or picks a result.
	pub fn run(&mut self) -> Result<SearchOutcome> {
		self.session.initialize();

		let mut terminal = ratatui::init();
		let result = self.event_loop(&mut terminal);
		ratatui::restore();

		self.session.teardown();
		result
	}

	fn event_loop(&mut self, terminal: &mut ratatui::DefaultTerminal) -> Result<SearchOutcome> {
		terminal.clear()?;
		loop {
			logging::pump();
			self.tick();
			terminal.draw(|frame| self.draw(frame))?;

			if event::poll(POLL_INTERVAL)? {
				match event::read()? {
					Event::Key(key) if key.kind == KeyEventKind::Press => {
						if let Some(outcome) = self.handle_key(key) {
							return Ok(outcome);
						}
					}
					_ => {}
				}
			}
		}
	}

	/// Apply finished requests and advance the spinner.
	pub(crate) fn tick(&mut self) {
		if self.session.pump() {
			self.ensure_selection();
		}
		if self.session.status() == SessionStatus::Fetching {
			self.throbber_state.calc_next();
		}
	}

	pub(crate) fn handle_key(&mut self, key: KeyEvent) -> Option<SearchOutcome> {
		let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
		match key.code {
			KeyCode::Esc => return Some(self.outcome(false)),
			KeyCode::Char('c') if ctrl => return Some(self.outcome(false)),
			KeyCode::Char('o') if ctrl => return Some(self.outcome(true)),
			KeyCode::Enter => {
				self.session.submit();
				self.table_state.select(Some(0));
				self.ensure_selection();
			}
			KeyCode::Up => self.move_selection_up(),
			KeyCode::Down => self.move_selection_down(),
			KeyCode::Char('d') if ctrl => self.dismiss_selected(),
			KeyCode::Delete => self.dismiss_selected(),
			KeyCode::Char('n') if ctrl => {
				self.session.load_more();
			}
			KeyCode::PageDown => {
				self.session.load_more();
			}
			KeyCode::Char('r') if ctrl => {
				if self.session.clear_error() {
					debug!("error dismissed");
				}
			}
			KeyCode::F(12) => self.show_logs = !self.show_logs,
			_ => {
				if self.search_input.input(key) {
					self.session.change_query_text(self.search_input.text());
				}
			}
		}
		None
	}

	fn outcome(&self, accepted: bool) -> SearchOutcome {
		SearchOutcome {
			accepted,
			query: self.session.query_text().to_string(),
			selection: if accepted {
				self.selected_item().cloned()
			} else {
				None
			},
		}
	}

	pub(crate) fn selected_item(&self) -> Option<&Item> {
		let index = self.table_state.selected()?;
		self.session.hits().get(index)
	}

	fn dismiss_selected(&mut self) {
		let Some(object_id) = self.selected_item().map(|item| item.object_id.clone()) else {
			return;
		};
		if self.session.dismiss(&object_id) {
			self.ensure_selection();
		}
	}

	fn move_selection_up(&mut self) {
		if let Some(selected) = self.table_state.selected()
			&& selected > 0
		{
			self.table_state.select(Some(selected - 1));
		}
	}

	fn move_selection_down(&mut self) {
		if let Some(selected) = self.table_state.selected()
			&& selected + 1 < self.session.hits().len()
		{
			self.table_state.select(Some(selected + 1));
		}
	}

	fn ensure_selection(&mut self) {
		let len = self.session.hits().len();
		match self.table_state.selected() {
			_ if len == 0 => self.table_state.select(None),
			None => self.table_state.select(Some(0)),
			Some(selected) if selected >= len => self.table_state.select(Some(len - 1)),
			Some(_) => {}
		}
	}
}
