//! Render functions for the TUI.
//!
//! Layout: header (category tabs or active search), the article card with
//! its pager dots, and a one-line status bar.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use std::borrow::Cow;
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::pager::{max_page, PAGE_SIZE};

/// Minimum terminal dimensions required for normal operation.
const MIN_WIDTH: u16 = 40;
const MIN_HEIGHT: u16 = 10;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

pub(super) fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(f, app, chunks[0]);
    render_card(f, app, chunks[1]);
    render_status(f, app, chunks[2]);
}

/// Header: search prompt while typing, the committed search when one is
/// active, otherwise the category tabs.
fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let line = if app.search_mode {
        Line::from(vec![
            Span::styled("Search: ", Style::default().fg(Color::Yellow)),
            Span::raw(app.search_input.clone()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ])
    } else if app.favorites_view {
        Line::from(Span::styled(
            format!("Favorites ({})", app.favorites.len()),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ))
    } else if !app.search.is_empty() {
        Line::from(vec![
            Span::styled("Search: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                app.search.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ])
    } else {
        let mut spans = Vec::with_capacity(app.categories.len() * 2);
        for (i, category) in app.categories.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            let style = if i == app.selected_category {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::styled(category.clone(), style));
        }
        Line::from(spans)
    };

    let header = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" gazette "),
    );
    f.render_widget(header, area);
}

/// The single-article card with its pager dots.
fn render_card(f: &mut Frame, app: &App, area: Rect) {
    let (pager, total_known) = if app.favorites_view {
        (&app.fav_pager, Some(app.favorites.len()))
    } else {
        (&app.pager, None)
    };

    let page_label = match total_known {
        Some(total) => format!(" Page {}/{} ", pager.page, max_page(total)),
        None => format!(" Page {} ", pager.page),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(page_label)
        .title_bottom(Line::from(dots_line(app)).centered());

    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.width < 1 || inner.height < 1 {
        return;
    }

    let Some(article) = app.current_article() else {
        render_empty_card(f, app, inner);
        return;
    };

    let mut lines: Vec<Line> = Vec::new();

    let star = if app.favorites.contains(article) {
        "★ "
    } else {
        ""
    };
    let title = if article.title.is_empty() {
        "(untitled)"
    } else {
        article.title.as_str()
    };
    lines.push(Line::from(vec![
        Span::styled(star, Style::default().fg(Color::Yellow)),
        Span::styled(
            truncate(title, inner.width.saturating_sub(2) as usize),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]));

    let mut byline = Vec::new();
    if let Some(source) = article.source.as_ref().and_then(|s| s.display()) {
        byline.push(source.to_string());
    }
    if let Some(published) = article.published_at.as_deref() {
        // Timestamps arrive as RFC 3339; the date part is enough here.
        byline.push(published.chars().take(10).collect());
    }
    if !byline.is_empty() {
        lines.push(Line::from(Span::styled(
            byline.join(" · "),
            Style::default().fg(Color::DarkGray),
        )));
    }

    lines.push(Line::raw(""));
    if let Some(body) = article.body() {
        lines.push(Line::raw(body.to_string()));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        truncate(&article.url, inner.width as usize),
        Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::UNDERLINED),
    )));

    let card = Paragraph::new(lines).wrap(Wrap { trim: true });
    f.render_widget(card, inner);
}

/// What to show when the current position has no article.
fn render_empty_card(f: &mut Frame, app: &App, area: Rect) {
    let text: Cow<'_, str> = if let Some(error) = &app.error {
        Cow::Borrowed(error.as_str())
    } else if app.is_loading && !app.favorites_view {
        Cow::Owned(format!(
            "{} Loading...",
            SPINNER_CHARS[app.spinner_frame % SPINNER_CHARS.len()]
        ))
    } else if app.favorites_view && app.favorites.is_empty() {
        Cow::Borrowed("No favorites yet. Press [f] on an article to save it.")
    } else {
        Cow::Borrowed("No articles here.")
    };

    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: true });

    // Vertically center-ish: skip the top third.
    let offset = area.height / 3;
    let centered = Rect {
        y: area.y + offset,
        height: area.height - offset,
        ..area
    };
    f.render_widget(paragraph, centered);
}

/// The three position dots for the current page, filled for the selection
/// and for slots that hold an article.
fn dots_line(app: &App) -> Vec<Span<'static>> {
    let (index, count) = if app.favorites_view {
        (app.fav_pager.index, app.current_articles().len())
    } else {
        (app.pager.index, app.current_articles().len())
    };

    let mut spans = Vec::with_capacity(PAGE_SIZE * 2 + 2);
    spans.push(Span::raw(" "));
    for i in 0..PAGE_SIZE {
        let (symbol, style) = if i == index {
            ("●", Style::default().fg(Color::Cyan))
        } else if i < count {
            ("●", Style::default().fg(Color::DarkGray))
        } else {
            ("○", Style::default().fg(Color::DarkGray))
        };
        spans.push(Span::styled(symbol, style));
        spans.push(Span::raw(" "));
    }
    spans
}

/// Render the status bar.
fn render_status(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if app.is_loading && !app.favorites_view {
        Cow::Owned(format!(
            "{} Loading...",
            SPINNER_CHARS[app.spinner_frame % SPINNER_CHARS.len()]
        ))
    } else if let Some(error) = &app.error {
        Cow::Borrowed(error.as_str())
    } else if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_str())
    } else if app.search_mode {
        Cow::Borrowed("Type to search | ESC cancel | ENTER confirm")
    } else {
        Cow::Borrowed("[n/p]navigate [1-3]select [c]ategory [/]search [f]avorite [v]iew favs [o]pen [q]uit")
    };

    let style = if app.error.is_some() && !app.is_loading {
        Style::default().bg(Color::Red).fg(Color::White)
    } else {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    };

    f.render_widget(Paragraph::new(text).style(style), area);
}

/// Truncate to a display width, appending an ellipsis when cut.
fn truncate(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut out = String::new();
    let mut width = 0;
    for c in s.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if width + w + 1 > max_width {
            break;
        }
        width += w;
        out.push(c);
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string_unchanged() {
        assert_eq!(truncate("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_cuts_with_ellipsis() {
        let out = truncate("a long headline about things", 10);
        assert!(out.ends_with('…'));
        assert!(out.width() <= 10);
    }

    #[test]
    fn test_truncate_respects_wide_chars() {
        let out = truncate("日本語のニュース見出し", 8);
        assert!(out.width() <= 8);
    }
}
