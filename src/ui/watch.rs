use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use regex::Regex;
use std::sync::LazyLock;

use crate::catalog::AnimeSummary;
use crate::mirror::episode_path;
use crate::watch::WatchSession;

use super::widgets::{format_episode_num, titled_block};

static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Catalog descriptions are HTML fragments; keep the text and line breaks
fn strip_html(description: &str) -> String {
    let with_breaks = LINE_BREAK.replace_all(description, "\n");
    TAG.replace_all(&with_breaks, "")
        .replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .trim()
        .to_string()
}

pub fn render_watch_view(
    frame: &mut Frame,
    area: Rect,
    session: &WatchSession,
    episodes_state: &mut ListState,
    accent: Color,
) {
    if session.loading {
        let loading = Paragraph::new("Tracking data on the server...")
            .block(titled_block("Watch", accent))
            .style(Style::default().fg(accent));
        frame.render_widget(loading, area);
        return;
    }

    let Some(anime) = &session.anime else {
        let missing = Paragraph::new(format!("No data for id {}.", session.id))
            .block(titled_block("Watch", accent))
            .style(Style::default().fg(Color::Red));
        frame.render_widget(missing, area);
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
        .split(area);

    let console_height = if session.override_visible { 5 } else { 0 };

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(console_height),
            Constraint::Length(4),
            Constraint::Min(5),
        ])
        .split(columns[0]);

    render_source(frame, left[0], session, accent);
    if session.override_visible {
        render_override_console(frame, left[1], session, accent);
    }
    render_title(frame, left[2], anime, session, accent);
    render_details(frame, left[3], anime, accent);
    render_episode_list(frame, columns[1], session, episodes_state, accent);
}

fn render_source(frame: &mut Frame, area: Rect, session: &WatchSession, accent: Color) {
    let lines = vec![
        Line::from(vec![
            Span::styled("PROXY: ", Style::default().fg(Color::DarkGray)),
            Span::styled(session.slug.clone(), Style::default().fg(Color::Gray)),
        ]),
        Line::from(Span::styled(
            session.source_url(),
            Style::default().fg(accent).add_modifier(Modifier::UNDERLINED),
        )),
    ];

    let title = format!("Mirror: {}", session.mirror_host());
    let source = Paragraph::new(lines)
        .block(titled_block(&title, accent))
        .wrap(Wrap { trim: false });
    frame.render_widget(source, area);
}

fn render_override_console(frame: &mut Frame, area: Rect, session: &WatchSession, accent: Color) {
    let lines = vec![
        Line::from(vec![
            Span::styled(session.slug.clone(), Style::default().fg(Color::White)),
            Span::styled(
                format!("-episodio-{}", session.current_episode),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(Span::styled(
            "If the video does not load, the title on the mirror may differ. Edit the slug above.",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let console = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent))
                .title(" Override // slug target ")
                .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(console, area);

    frame.set_cursor_position((area.x + session.slug.chars().count() as u16 + 1, area.y + 1));
}

fn render_title(
    frame: &mut Frame,
    area: Rect,
    anime: &AnimeSummary,
    session: &WatchSession,
    accent: Color,
) {
    let lines = vec![
        Line::from(Span::styled(
            anime.display_title().to_uppercase(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD | Modifier::ITALIC),
        )),
        Line::from(vec![
            Span::styled(
                format!("EP {}", session.current_episode),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                episode_path(&session.slug, session.current_episode),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
    ];

    let title = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::LEFT)
            .border_style(Style::default().fg(accent)),
    );
    frame.render_widget(title, area);
}

fn render_details(frame: &mut Frame, area: Rect, anime: &AnimeSummary, accent: Color) {
    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);

    let year = anime
        .season_year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "?".to_string());
    let episodes = anime
        .episodes
        .map(|n| n.to_string())
        .unwrap_or_else(|| "?".to_string());

    let description = anime
        .description
        .as_deref()
        .map(strip_html)
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| "No description available.".to_string());

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Year ", label),
            Span::styled(year, value),
            Span::raw("   "),
            Span::styled("Format ", label),
            Span::styled(anime.format.clone(), value),
            Span::raw("   "),
            Span::styled("Eps ", label),
            Span::styled(episodes, value),
            Span::raw("   "),
            Span::styled("Status ", label),
            Span::styled(anime.status.clone(), value),
        ]),
        Line::raw(""),
    ];
    lines.extend(
        description
            .lines()
            .map(|l| Line::styled(l.to_string(), Style::default().fg(Color::Gray))),
    );

    let details = Paragraph::new(lines)
        .block(titled_block("Info", accent))
        .wrap(Wrap { trim: true });
    frame.render_widget(details, area);
}

fn render_episode_list(
    frame: &mut Frame,
    area: Rect,
    session: &WatchSession,
    episodes_state: &mut ListState,
    accent: Color,
) {
    let total = session.total_episodes();

    let items: Vec<ListItem> = (1..=total)
        .map(|ep| {
            let current = ep == session.current_episode;
            let marker = if current { "●" } else { " " };
            let style = if current {
                Style::default().fg(accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", marker), Style::default().fg(accent)),
                Span::styled(format_episode_num(ep), style),
                Span::raw("  "),
                Span::styled(format!("Episode {}", ep), style),
            ]))
        })
        .collect();

    let title = format!("Episodes ({})", total);
    let list = List::new(items)
        .block(titled_block(&title, accent))
        .highlight_style(
            Style::default()
                .bg(accent)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, area, episodes_state);
}
