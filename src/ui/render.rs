use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Margin, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};
use throbber_widgets_tui::Throbber;
use tui_logger::{TuiLoggerLevelOutput, TuiLoggerWidget};

use super::App;
use super::table;
use crate::session::SessionStatus;

const PROMPT: &str = "HN > ";
const STATUS_WIDTH: u16 = 26;
const LOG_PANE_HEIGHT: u16 = 10;

impl App<'_> {
	pub(crate) fn draw(&mut self, frame: &mut Frame) {
		let area = frame.area().inner(Margin {
			vertical: 0,
			horizontal: 1,
		});

		let mut constraints = vec![
			Constraint::Length(1),
			Constraint::Min(1),
			Constraint::Length(1),
		];
		if self.show_logs {
			constraints.push(Constraint::Length(LOG_PANE_HEIGHT));
		}
		let layout = Layout::vertical(constraints).split(area);

		self.render_input_row(frame, layout[0]);
		self.render_body(frame, layout[1]);
		self.render_footer(frame, layout[2]);
		if self.show_logs {
			self.render_log_pane(frame, layout[3]);
		}
	}

	fn render_input_row(&mut self, frame: &mut Frame, area: Rect) {
		let [prompt_area, input_area, status_area] = Layout::horizontal([
			Constraint::Length(PROMPT.len() as u16),
			Constraint::Min(1),
			Constraint::Length(STATUS_WIDTH),
		])
		.areas(area);

		frame.render_widget(
			Paragraph::new(PROMPT).style(self.theme.prompt_style()),
			prompt_area,
		);
		self.search_input.render_textarea(frame, input_area);

		match self.session.status() {
			SessionStatus::Fetching => {
				let throbber = Throbber::default()
					.label(format!("fetching '{}'", self.session.search_key()))
					.style(self.theme.prompt_style());
				frame.render_stateful_widget(throbber, status_area, &mut self.throbber_state);
			}
			SessionStatus::Failed => {
				let status = Paragraph::new("request failed")
					.alignment(Alignment::Right)
					.style(self.theme.error_style());
				frame.render_widget(status, status_area);
			}
			SessionStatus::Idle => {
				let text = match self.session.active_page() {
					Some(page) => format!("page {} · {} hits", page.page, page.hits.len()),
					None => String::new(),
				};
				let status = Paragraph::new(text)
					.alignment(Alignment::Right)
					.style(self.theme.empty_style());
				frame.render_widget(status, status_area);
			}
		}
	}

	fn render_body(&mut self, frame: &mut Frame, area: Rect) {
		if let Some(error) = self.session.error() {
			let notice = Paragraph::new(vec![
				Line::from("Something went wrong.").style(self.theme.error_style()),
				Line::from(error.to_string()).style(self.theme.empty_style()),
				Line::from(""),
				Line::from("Press Ctrl-R to dismiss.").style(self.theme.empty_style()),
			])
			.alignment(Alignment::Center)
			.wrap(Wrap { trim: true });
			frame.render_widget(notice, centered_rows(area, 4));
			return;
		}

		let hits = self.session.hits();
		if hits.is_empty() {
			let text = if self.session.status() == SessionStatus::Fetching {
				"Searching…"
			} else {
				"No results"
			};
			let empty = Paragraph::new(text)
				.alignment(Alignment::Center)
				.style(self.theme.empty_style());
			frame.render_widget(empty, centered_rows(area, 1));
			return;
		}

		table::render_hits(frame, area, &mut self.table_state, hits, &self.theme);
	}

	fn render_footer(&self, frame: &mut Frame, area: Rect) {
		let hint_style = self.theme.empty_style();
		let mut spans = vec![
			Span::styled(" More ", self.theme.header_style()),
			Span::styled(" Ctrl-N", hint_style),
			Span::styled("   Enter search · ↑↓ select · Ctrl-D dismiss · Ctrl-O pick", hint_style),
		];
		if self.session.error().is_some() {
			spans.push(Span::styled(" · Ctrl-R clear error", self.theme.error_style()));
		}
		spans.push(Span::styled(" · F12 log · Esc quit", hint_style));
		frame.render_widget(Paragraph::new(Line::from(spans)), area);
	}

	fn render_log_pane(&self, frame: &mut Frame, area: Rect) {
		let widget = TuiLoggerWidget::default()
			.block(Block::bordered().title(" Log "))
			.output_level(Some(TuiLoggerLevelOutput::Abbreviated))
			.output_target(false)
			.output_file(false)
			.output_line(false)
			.style_error(self.theme.error_style())
			.style_warn(self.theme.highlight_style())
			.style(Style::default());
		frame.render_widget(widget, area);
	}
}

/// A full-width strip of `height` rows centred vertically in `area`.
fn centered_rows(area: Rect, height: u16) -> Rect {
	let height = height.min(area.height);
	Rect {
		x: area.x,
		y: area.y + (area.height - height) / 2,
		width: area.width,
		height,
	}
}
