use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, HighlightSpacing, Paragraph, Row, Table, TableState};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::api::Item;
use crate::theme::Theme;

const HIGHLIGHT_SYMBOL: &str = "▶ ";
const TABLE_COLUMN_SPACING: u16 = 1;
const ELLIPSIS: char = '…';

const HEADERS: [&str; 5] = ["Title", "Author", "Comments", "Points", "URL"];

fn column_widths() -> [Constraint; 5] {
	[
		Constraint::Percentage(45),
		Constraint::Length(14),
		Constraint::Length(8),
		Constraint::Length(6),
		Constraint::Fill(1),
	]
}

/// Render the hits table with a header and a rule under it.
pub(crate) fn render_hits(
	frame: &mut Frame,
	area: Rect,
	table_state: &mut TableState,
	hits: &[Item],
	theme: &Theme,
) {
	let highlight_spacing = HighlightSpacing::WhenSelected;
	let selection_width = selection_column_width(table_state, &highlight_spacing);
	let constraints = column_widths();
	let widths = resolve_column_widths(area, &constraints, selection_width, TABLE_COLUMN_SPACING);

	let rows = hits.iter().map(|item| build_row(item, &widths));
	let header = Row::new(HEADERS.iter().map(|title| Cell::from(*title)))
		.style(theme.header_style())
		.height(1)
		.bottom_margin(1);

	let table = Table::new(rows, constraints)
		.header(header)
		.column_spacing(TABLE_COLUMN_SPACING)
		.highlight_spacing(highlight_spacing)
		.row_highlight_style(theme.row_highlight_style())
		.highlight_symbol(HIGHLIGHT_SYMBOL);
	frame.render_stateful_widget(table, area, table_state);

	render_header_rule(frame, area, theme);
}

fn build_row<'a>(item: &'a Item, widths: &[u16]) -> Row<'a> {
	let width = |index: usize| widths.get(index).copied().unwrap_or(u16::MAX);
	let title = if item.title.is_empty() {
		"(untitled)"
	} else {
		item.title.as_str()
	};
	let url = item.url.as_deref().unwrap_or("");

	Row::new(vec![
		Cell::from(truncate_to_width(title, width(0))),
		Cell::from(truncate_to_width(&item.author, width(1))),
		Cell::from(Line::from(item.num_comments.to_string()).right_aligned()),
		Cell::from(Line::from(item.points.to_string()).right_aligned()),
		Cell::from(truncate_to_width(url, width(4))),
	])
}

/// Draw a horizontal rule in the blank line the header's bottom margin leaves.
fn render_header_rule(frame: &mut Frame, area: Rect, theme: &Theme) {
	if area.height < 2 || area.width == 0 {
		return;
	}

	let width = area.width as usize;
	let rule = if width <= 2 {
		Line::from(Span::styled(
			" ".repeat(width),
			Style::new().bg(theme.header_bg()),
		))
	} else {
		Line::from(vec![
			Span::styled(" ", Style::new().bg(theme.header_bg())),
			Span::styled(
				"─".repeat(width - 2),
				Style::new().bg(theme.header_bg()).fg(theme.header_fg()),
			),
			Span::styled(" ", Style::new().bg(theme.header_bg())),
		])
	};

	let rule_area = Rect {
		x: area.x,
		y: area.y + 1,
		width: area.width,
		height: 1,
	};
	frame.render_widget(Paragraph::new(rule), rule_area);
}

fn selection_column_width(state: &TableState, spacing: &HighlightSpacing) -> u16 {
	let should_add = match spacing {
		HighlightSpacing::Always => true,
		HighlightSpacing::WhenSelected => state.selected().is_some(),
		HighlightSpacing::Never => false,
	};
	if should_add {
		UnicodeWidthStr::width(HIGHLIGHT_SYMBOL) as u16
	} else {
		0
	}
}

/// Compute the width each column will get, matching the table's own layout.
fn resolve_column_widths(
	area: Rect,
	constraints: &[Constraint],
	selection_width: u16,
	column_spacing: u16,
) -> Vec<u16> {
	if constraints.is_empty() {
		return Vec::new();
	}

	let layout_area = Rect {
		x: 0,
		y: 0,
		width: area.width,
		height: 1,
	};
	let [_, columns_area] =
		Layout::horizontal([Constraint::Length(selection_width), Constraint::Fill(0)])
			.areas(layout_area);

	Layout::horizontal(constraints.to_vec())
		.spacing(column_spacing)
		.split(columns_area)
		.iter()
		.map(|rect| rect.width)
		.collect()
}

/// Shorten `text` to at most `width` terminal cells, ending in an ellipsis
/// when anything was cut.
pub(crate) fn truncate_to_width(text: &str, width: u16) -> String {
	let max = width as usize;
	if UnicodeWidthStr::width(text) <= max {
		return text.to_string();
	}
	if max == 0 {
		return String::new();
	}

	let mut out = String::new();
	let mut used = 0;
	for ch in text.chars() {
		let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
		if used + ch_width + 1 > max {
			break;
		}
		out.push(ch);
		used += ch_width;
	}
	out.push(ELLIPSIS);
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn short_text_is_untouched() {
		assert_eq!(truncate_to_width("redux", 10), "redux");
		assert_eq!(truncate_to_width("redux", 5), "redux");
	}

	#[test]
	fn long_text_gets_ellipsis_within_width() {
		let cut = truncate_to_width("Show HN: a very long title", 10);
		assert_eq!(cut, "Show HN: …");
		assert_eq!(UnicodeWidthStr::width(cut.as_str()), 10);
	}

	#[test]
	fn wide_characters_count_double() {
		let cut = truncate_to_width("日本語のタイトル", 7);
		assert!(UnicodeWidthStr::width(cut.as_str()) <= 7);
		assert!(cut.ends_with(ELLIPSIS));
	}

	#[test]
	fn zero_width_yields_empty() {
		assert_eq!(truncate_to_width("anything", 0), "");
	}

	#[test]
	fn widths_follow_constraints() {
		let area = Rect::new(0, 0, 100, 10);
		let widths = resolve_column_widths(area, &column_widths(), 2, TABLE_COLUMN_SPACING);
		assert_eq!(widths.len(), 5);
		assert_eq!(widths[1], 14);
		assert_eq!(widths[2], 8);
		assert_eq!(widths[3], 6);
		let total: u16 = widths.iter().sum::<u16>() + 4 * TABLE_COLUMN_SPACING;
		assert!(total <= 98);
	}
}
