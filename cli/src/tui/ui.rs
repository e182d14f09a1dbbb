use puck_core::service::dto::{ChartSeries, Edge, SeriesKind};
use puck_core::{
    format_value, AggregateMode, PlayerRecord, Position, RankedPlayer, Side, StatKey, StatWeights,
    WeightMode,
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, BorderType, List, ListItem, Paragraph, Row, Table, Tabs},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::tui::app::{App, InputMode, View};

const BAR_WIDTH: u16 = 8;
const FALLBACK_COLUMNS: [StatKey; 3] = [StatKey::Goals, StatKey::Assists, StatKey::Points];

fn side_color(side: Side) -> Color {
    match side {
        Side::A => Color::Blue,
        Side::B => Color::Red,
    }
}

fn panel(title: String) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
}

/// Cuts `text` to at most `width` columns, marking the cut with an ellipsis.
fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Bars only carry unsigned magnitudes; the label keeps the real value.
fn bar(label: &str, value: f64, text: String, color: Color) -> Bar<'static> {
    Bar::default()
        .label(Line::from(truncate(label, BAR_WIDTH as usize)))
        .value((value.max(0.0) * 100.0).round() as u64)
        .style(Style::default().fg(color))
        .text_value(text)
}

/// Every statistic of `record`, `columns` to a line, emphasized ones in bold.
fn stat_lines(record: &PlayerRecord, emphasized: impl Fn(StatKey) -> bool, columns: usize) -> Vec<Line<'static>> {
    StatKey::ALL
        .chunks(columns)
        .map(|keys| {
            let spans: Vec<Span> = keys
                .iter()
                .map(|&key| {
                    let text = format!("{:<7}{:>9}  ", key.short_form(), format_value(key, record.stat(key), false));
                    if emphasized(key) {
                        Span::styled(text, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
                    } else {
                        Span::raw(text)
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

pub fn draw(f: &mut Frame, app: &mut App) {
    let size = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status
            Constraint::Length(1), // Footer/Help
        ])
        .split(size);

    let titles: Vec<Line> = View::ALL.iter().map(|v| Line::from(v.title())).collect();
    let tabs = Tabs::new(titles)
        .select(app.view.index())
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(panel(" PUCK ".to_string()));
    f.render_widget(tabs, main_chunks[0]);

    match app.view {
        View::Rankings => draw_rankings(f, app, main_chunks[1]),
        View::Roster => draw_roster(f, app, main_chunks[1]),
        View::Trade => draw_trade(f, app, main_chunks[1]),
    }

    let status = Paragraph::new(app.status.clone().unwrap_or_default())
        .style(Style::default().fg(Color::Yellow));
    f.render_widget(status, main_chunks[2]);

    let help = match (&app.input_mode, app.view) {
        (InputMode::Searching, _) => "Type a name | ↑/↓: Pick | Enter: Add | Esc: Cancel",
        (InputMode::Normal, View::Rankings) => {
            "Tab: View | ←/→: Stat | +/-: Weight | w: Weight mode | m: Min/Max | 1-4: Positions | q: Quit"
        }
        (InputMode::Normal, View::Roster) => {
            "Tab: View | /: Search | d: Remove | t: Total/Avg | ←/→: Stat | c: Chart | q: Quit"
        }
        (InputMode::Normal, View::Trade) => {
            "Tab: View | /: Search | s: Side | d: Remove | t: Total/Avg | ←/→: Stat | n/v: Series | q: Quit"
        }
    };
    let footer = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(footer, main_chunks[3]);
}

fn draw_search(f: &mut Frame, app: &App, area: Rect, title: String) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let input = Paragraph::new(app.input.as_str())
        .style(Style::default().fg(Color::Yellow))
        .block(panel(title));
    f.render_widget(input, chunks[0]);

    let typed: String = app.input.chars().take(app.cursor_position).collect();
    f.set_cursor_position((chunks[0].x + 1 + typed.width() as u16, chunks[0].y + 1));

    let items: Vec<ListItem> = app
        .suggestions()
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let style = if i == app.suggestion_index {
                Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(p.name.clone(), style),
                Span::styled(format!("  {} {}", p.team, p.position), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();
    f.render_widget(List::new(items).block(panel(" Suggestions ".to_string())), chunks[1]);
}

// --- Rankings ---

fn draw_rankings(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(10)])
        .split(area);

    let side_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(5)])
        .split(chunks[0]);

    let mode = app.rank.options.weight_mode;
    let items: Vec<ListItem> = StatKey::ALL
        .iter()
        .enumerate()
        .map(|(i, &key)| {
            let weight = app.rank.service.weight(key, &app.rank.weights, mode);
            let shown = match mode {
                WeightMode::Manual => format!("x{}", weight),
                WeightMode::Default => format!("{:.5}", weight),
            };
            let mut style = if app.rank.weights.is_selected(key) {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            if i == app.rank.stat_cursor {
                style = style.bg(Color::DarkGray);
            }
            ListItem::new(Line::from(Span::styled(format!("{:<8}{:>10}", key.short_form(), shown), style)))
        })
        .collect();
    let title = match mode {
        WeightMode::Manual => " Weights ",
        WeightMode::Default => " Weights (usage) ",
    };
    f.render_widget(List::new(items).block(panel(title.to_string())), side_chunks[0]);

    let positions: Vec<Span> = Position::SKATERS
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let on = app.rank.options.positions.contains(p);
            let style = if on { Style::default().fg(Color::Green) } else { Style::default().fg(Color::DarkGray) };
            Span::styled(format!("{}:{} ", i + 1, p.code()), style)
        })
        .collect();
    let scaling = if app.rank.options.min_max { "Min/Max Sorting" } else { "Default Sorting" };
    let options = Paragraph::new(vec![Line::from(positions), Line::from(scaling)])
        .block(panel(" Filters ".to_string()));
    f.render_widget(options, side_chunks[1]);

    let ranked = app.rank.ranked();
    let columns: Vec<StatKey> = if app.rank.weights.selected().is_empty() {
        FALLBACK_COLUMNS.to_vec()
    } else {
        app.rank.weights.selected().to_vec()
    };
    let min_max = app.rank.options.min_max;

    let rows: Vec<Row> = ranked
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let mut cells = vec![
                Span::raw((i + 1).to_string()),
                Span::styled(r.record.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(r.record.team.clone()),
                Span::raw(r.record.position.code()),
                Span::styled(format!("{:.3}", r.score), Style::default().fg(Color::Cyan)),
            ];
            cells.extend(columns.iter().map(|k| Span::raw(format_value(*k, r.values.get(*k), min_max))));
            Row::new(cells)
        })
        .collect();

    let mut widths = vec![
        Constraint::Length(4),
        Constraint::Min(18),
        Constraint::Length(5),
        Constraint::Length(4),
        Constraint::Length(9),
    ];
    widths.extend(columns.iter().map(|_| Constraint::Length(7)));

    let mut header = vec!["#", "Name", "Team", "Pos", "Score"];
    header.extend(columns.iter().map(|k| k.short_form()));

    let table = Table::new(rows, widths)
        .header(Row::new(header).style(Style::default().fg(Color::Yellow)))
        .block(panel(format!(" Top {} ", ranked.len())))
        .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol(">> ");

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(36)])
        .split(chunks[1]);

    f.render_stateful_widget(table, body[0], &mut app.rank.state);

    let highlighted = app.rank.state.selected().and_then(|i| ranked.get(i));
    draw_player_detail(f, highlighted, &app.rank.weights, body[1]);
}

fn draw_player_detail(f: &mut Frame, ranked: Option<&RankedPlayer>, weights: &StatWeights, area: Rect) {
    let Some(ranked) = ranked else {
        f.render_widget(panel(" Player ".to_string()), area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(StatKey::ALL.len() as u16 + 2), Constraint::Min(3)])
        .split(area);

    let lines = stat_lines(&ranked.record, |key| weights.is_selected(key), 1);
    let title = format!(" {} ", truncate(&ranked.record.name, area.width.saturating_sub(4) as usize));
    f.render_widget(Paragraph::new(lines).block(panel(title)), chunks[0]);

    // Pool standing of the weighted stats, 0% at the pool minimum.
    let bars: Vec<Bar> = weights
        .selected()
        .iter()
        .map(|&key| {
            let standing = ranked.standing.get(key);
            bar(key.short_form(), standing, format!("{:.0}%", standing * 100.0), Color::Yellow)
        })
        .collect();
    let chart = BarChart::default()
        .block(panel(" Standing ".to_string()))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .max(100)
        .data(BarGroup::default().bars(&bars));
    f.render_widget(chart, chunks[1]);
}

// --- Roster ---

fn draw_roster(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let left = if matches!(app.input_mode, InputMode::Searching) {
        let split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(8), Constraint::Min(3)])
            .split(chunks[0]);
        draw_search(f, app, split[0], " Add to team ".to_string());
        split[1]
    } else {
        chunks[0]
    };

    let rows: Vec<Row> = app
        .roster
        .roster
        .entries()
        .iter()
        .map(|e| {
            let p = &e.player;
            Row::new(vec![
                Span::styled(p.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(p.team.clone()),
                Span::raw(p.position.code()),
                Span::raw(p.points.to_string()),
                Span::raw(p.time_on_ice_per_game.to_string()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(18),
            Constraint::Length(5),
            Constraint::Length(4),
            Constraint::Length(5),
            Constraint::Length(7),
        ],
    )
    .header(Row::new(vec!["Name", "Team", "Pos", "PTS", "TOI/GP"]).style(Style::default().fg(Color::Yellow)))
    .block(panel(format!(" Team ({}) ", app.roster.roster.len())))
    .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol(">> ");

    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(StatKey::ALL.len().div_ceil(2) as u16 + 2)])
        .split(left);
    f.render_stateful_widget(table, left_chunks[0], &mut app.roster.state);

    let highlighted = app
        .roster
        .state
        .selected()
        .and_then(|i| app.roster.roster.entries().get(i));
    let detail = match highlighted {
        Some(entry) => {
            let roster = &app.roster.roster;
            Paragraph::new(stat_lines(&entry.player, |key| roster.is_charted(key), 2))
                .block(panel(format!(" {} ", entry.player.name)))
        }
        None => Paragraph::new("").block(panel(" Player ".to_string())),
    };
    f.render_widget(detail, left_chunks[1]);

    let charted = app.roster.roster.charted().to_vec();
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints(if charted.is_empty() {
            vec![Constraint::Min(1)]
        } else {
            vec![Constraint::Length(StatKey::ALL.len() as u16 + 2), Constraint::Min(6)]
        })
        .split(chunks[1]);

    draw_roster_summary(f, app, right[0]);
    if !charted.is_empty() {
        draw_distributions(f, app, &charted, right[1]);
    }
}

fn draw_roster_summary(f: &mut Frame, app: &App, area: Rect) {
    let summary = app.roster.roster.summary(app.roster.mode);
    let items: Vec<ListItem> = summary
        .values
        .iter()
        .enumerate()
        .map(|(i, (key, value))| {
            let marker = if app.roster.roster.is_charted(*key) { "●" } else { " " };
            let mut style = Style::default();
            if i == app.roster.stat_cursor {
                style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
            }
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Cyan)),
                Span::styled(format!(" {:<22}{:>10}", key.label(), value.to_string()), style),
            ]))
        })
        .collect();

    let title = match app.roster.mode {
        AggregateMode::Total => " Team Stats (Total) ",
        AggregateMode::Average => " Team Stats (Average) ",
    };
    f.render_widget(List::new(items).block(panel(title.to_string())), area);
}

fn draw_distributions(f: &mut Frame, app: &App, charted: &[StatKey], area: Rect) {
    let constraints: Vec<Constraint> = charted
        .iter()
        .map(|_| Constraint::Ratio(1, charted.len() as u32))
        .collect();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (key, chunk) in charted.iter().zip(chunks.iter()) {
        let bars: Vec<Bar> = app
            .roster
            .roster
            .distribution(*key)
            .iter()
            .map(|p| bar(&p.name, p.value, format_value(*key, p.value, false), Color::Cyan))
            .collect();

        let chart = BarChart::default()
            .block(panel(format!(" {} ", key.label())))
            .bar_width(BAR_WIDTH)
            .bar_gap(1)
            .data(BarGroup::default().bars(&bars));
        f.render_widget(chart, *chunk);
    }
}

// --- Trade ---

fn draw_trade(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(35),
            Constraint::Percentage(35),
        ])
        .split(area);

    let sides = Layout::default()
        .direction(Direction::Vertical)
        .constraints(if matches!(app.input_mode, InputMode::Searching) {
            vec![Constraint::Length(8), Constraint::Min(3), Constraint::Min(3)]
        } else {
            vec![Constraint::Length(0), Constraint::Min(3), Constraint::Min(3)]
        })
        .split(chunks[0]);

    if matches!(app.input_mode, InputMode::Searching) {
        draw_search(f, app, sides[0], format!(" Add to {} ", app.trade.active_side));
    }
    draw_side(f, app, Side::A, sides[1]);
    draw_side(f, app, Side::B, sides[2]);

    draw_comparison(f, app, chunks[1]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[2]);
    let series = app.trade.series();
    draw_legend(f, app, &series, right[0]);
    draw_trade_chart(f, app, &series, right[1]);
}

fn draw_side(f: &mut Frame, app: &mut App, side: Side, area: Rect) {
    let active = app.trade.active_side == side;
    let rows: Vec<Row> = app
        .trade
        .board
        .entries(side)
        .iter()
        .map(|e| {
            Row::new(vec![
                Span::styled(e.player.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(e.player.team.clone()),
                Span::raw(e.player.position.code()),
            ])
        })
        .collect();

    let border = if active {
        Style::default().fg(side_color(side)).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let table = Table::new(rows, [Constraint::Min(14), Constraint::Length(5), Constraint::Length(4)])
        .block(panel(format!(" {} ", side)).border_style(border))
        .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol(">> ");

    if active {
        f.render_stateful_widget(table, area, &mut app.trade.state);
    } else {
        f.render_widget(table, area);
    }
}

fn trade_value(value: f64, mode: AggregateMode) -> String {
    match mode {
        AggregateMode::Average => format!("{:.2}", value),
        AggregateMode::Total => format!("{}", value),
    }
}

fn draw_comparison(f: &mut Frame, app: &App, area: Rect) {
    let mode = app.trade.mode;
    let rows: Vec<Row> = app
        .trade
        .board
        .compare(mode)
        .iter()
        .enumerate()
        .map(|(i, cmp)| {
            let (a_style, b_style) = match cmp.edge {
                Edge::SideA => (Style::default().fg(Color::Green), Style::default()),
                Edge::SideB => (Style::default(), Style::default().fg(Color::Green)),
                Edge::Even => (Style::default(), Style::default()),
            };
            let row = Row::new(vec![
                Span::raw(cmp.key.label()),
                Span::styled(trade_value(cmp.side_a, mode), a_style),
                Span::styled(trade_value(cmp.side_b, mode), b_style),
            ]);
            if i == app.trade.stat_cursor {
                row.style(Style::default().bg(Color::DarkGray))
            } else {
                row
            }
        })
        .collect();

    let table = Table::new(rows, [Constraint::Min(16), Constraint::Length(9), Constraint::Length(9)])
        .header(Row::new(vec!["Stat", "Team 1", "Team 2"]).style(Style::default().fg(Color::Yellow)))
        .block(panel(format!(" {} ", mode)));
    f.render_widget(table, area);
}

fn draw_legend(f: &mut Frame, app: &App, series: &[ChartSeries], area: Rect) {
    let items: Vec<ListItem> = series
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let check = if s.visible { "■" } else { "□" };
            let indent = match s.kind {
                SeriesKind::SideTotal => "",
                SeriesKind::Player => "  ",
            };
            let mut style = Style::default();
            if !s.visible {
                style = style.fg(Color::DarkGray);
            }
            if i == app.trade.series_cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            ListItem::new(Line::from(vec![
                Span::raw(indent),
                Span::styled(check, Style::default().fg(side_color(s.side))),
                Span::styled(format!(" {}", s.label), style),
            ]))
        })
        .collect();
    f.render_widget(List::new(items).block(panel(" Legend ".to_string())), area);
}

fn draw_trade_chart(f: &mut Frame, app: &App, series: &[ChartSeries], area: Rect) {
    let key = app.trade.current_stat();
    let index = app.trade.stat_cursor;
    let mode = app.trade.mode;

    let bars: Vec<Bar> = series
        .iter()
        .filter(|s| s.visible)
        .map(|s| {
            let value = s.values.get(index).copied().unwrap_or(0.0);
            let color = match (s.kind, s.side) {
                (SeriesKind::SideTotal, side) => side_color(side),
                (SeriesKind::Player, Side::A) => Color::LightBlue,
                (SeriesKind::Player, Side::B) => Color::LightRed,
            };
            bar(&s.label, value, trade_value(value, mode), color)
        })
        .collect();

    let chart = BarChart::default()
        .block(panel(format!(" {} ", key.label())))
        .bar_width(BAR_WIDTH)
        .bar_gap(1)
        .data(BarGroup::default().bars(&bars));
    f.render_widget(chart, area);
}
