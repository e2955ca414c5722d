use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::catalog::AnimeSummary;

use super::widgets::titled_block;

pub struct CatalogViewState<'a> {
    pub search_input: &'a str,
    pub search_focused: bool,
    pub active_search: Option<&'a str>,
    pub featured: Option<&'a AnimeSummary>,
    pub results: &'a [AnimeSummary],
    pub is_loading: bool,
}

pub fn render_catalog_view(
    frame: &mut Frame,
    area: Rect,
    view: &CatalogViewState,
    list_state: &mut ListState,
    accent: Color,
) {
    let featured_height = if view.featured.is_some() { 7 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(featured_height),
            Constraint::Min(3),
        ])
        .split(area);

    render_search_input(frame, chunks[0], view.search_input, view.search_focused, accent);

    if let Some(anime) = view.featured {
        render_featured(frame, chunks[1], anime, accent);
    }

    let title = match view.active_search {
        Some(term) => format!("Results: \"{}\"", term),
        None => "Trending".to_string(),
    };
    render_results(frame, chunks[2], &title, view.results, view.is_loading, list_state, accent);
}

fn render_search_input(frame: &mut Frame, area: Rect, input: &str, focused: bool, accent: Color) {
    let border = if focused { accent } else { Color::DarkGray };

    let paragraph = Paragraph::new(input)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title(" Search AniList ")
                .title_style(Style::default().fg(border).add_modifier(Modifier::BOLD)),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(paragraph, area);

    if focused {
        frame.set_cursor_position((area.x + input.chars().count() as u16 + 1, area.y + 1));
    }
}

fn render_featured(frame: &mut Frame, area: Rect, anime: &AnimeSummary, accent: Color) {
    let mut genres: Vec<Span> = Vec::new();
    for genre in anime.genres.iter().take(3) {
        genres.push(Span::styled(
            format!("[{}]", genre.to_uppercase()),
            Style::default().fg(Color::Gray),
        ));
        genres.push(Span::raw(" "));
    }

    let mut lines = vec![
        Line::from(Span::styled(
            anime.card_title().to_uppercase(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD | Modifier::ITALIC),
        )),
        Line::from(genres),
        Line::from(vec![
            Span::styled(score_label(anime), Style::default().fg(accent)),
            Span::raw("  "),
            Span::styled(format_line(anime), Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(vec![
            Span::styled("w", Style::default().fg(accent).add_modifier(Modifier::BOLD)),
            Span::styled(" start mission", Style::default().fg(Color::Gray)),
        ]),
    ];

    let image = anime.hero_image();
    if !image.is_empty() {
        lines.push(Line::from(Span::styled(
            image.to_string(),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let hero = Paragraph::new(lines)
        .block(titled_block("Rank S Detected", accent))
        .wrap(Wrap { trim: true });
    frame.render_widget(hero, area);
}

fn score_label(anime: &AnimeSummary) -> String {
    match anime.average_score {
        Some(score) => format!("LVL {}", score),
        None => "LVL ?".to_string(),
    }
}

/// `TV • 2023`, or `TV • UNK` when the year is unknown
fn format_line(anime: &AnimeSummary) -> String {
    let year = anime
        .season_year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "UNK".to_string());
    format!("{} • {}", anime.format, year)
}

fn render_results(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    results: &[AnimeSummary],
    is_loading: bool,
    list_state: &mut ListState,
    accent: Color,
) {
    if is_loading {
        let loading = Paragraph::new("Loading catalog...")
            .block(titled_block(title, accent))
            .style(Style::default().fg(accent));
        frame.render_widget(loading, area);
        return;
    }

    if results.is_empty() {
        let empty = Paragraph::new("No data found.")
            .block(titled_block(title, accent))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = results
        .iter()
        .map(|anime| {
            let episodes = match anime.episodes {
                Some(n) => format!("EP {:>4}", n),
                None => "       ".to_string(),
            };
            let score = match anime.average_score {
                Some(s) => format!("LVL {:>3}", s),
                None => "       ".to_string(),
            };

            let line = Line::from(vec![
                Span::styled(episodes, Style::default().fg(Color::Gray)),
                Span::raw(" │ "),
                Span::styled(score, Style::default().fg(accent)),
                Span::raw(" │ "),
                Span::styled(
                    anime.card_title().to_string(),
                    Style::default().fg(Color::White),
                ),
                Span::raw("  "),
                Span::styled(format_line(anime), Style::default().fg(Color::DarkGray)),
            ]);

            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(titled_block(title, accent))
        .highlight_style(
            Style::default()
                .bg(accent)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, area, list_state);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line_unknown_year() {
        let mut anime = AnimeSummary {
            format: "MOVIE".to_string(),
            ..Default::default()
        };
        assert_eq!(format_line(&anime), "MOVIE • UNK");

        anime.season_year = Some(2016);
        assert_eq!(format_line(&anime), "MOVIE • 2016");
    }

    #[test]
    fn test_score_label() {
        let mut anime = AnimeSummary::default();
        assert_eq!(score_label(&anime), "LVL ?");
        anime.average_score = Some(91);
        assert_eq!(score_label(&anime), "LVL 91");
    }
}
