use puck_core::service::dto::{ChartSeries, Edge, RosterSummary};
use puck_core::{
    format_value, AggregateMode, PlayerRecord, RankedPlayer, RankingOptions, RankingService,
    Roster, StatKey, StatWeights, TradeBoard, WeightMode,
};
use tabled::builder::Builder;
use tabled::settings::object::{Columns, Rows};
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};

const FALLBACK_COLUMNS: [StatKey; 3] = [StatKey::Goals, StatKey::Assists, StatKey::Points];

#[derive(Tabled)]
struct SearchRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Team")]
    team: String,
    #[tabled(rename = "Pos")]
    position: String,
    #[tabled(rename = "PTS")]
    points: String,
    #[tabled(rename = "Headshot")]
    headshot: String,
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Stat")]
    stat: String,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct ShareRow {
    #[tabled(rename = "Player")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Share")]
    share: String,
}

#[derive(Tabled)]
struct SeriesRow {
    #[tabled(rename = "Series")]
    label: String,
    #[tabled(rename = "Stack")]
    stack: String,
    #[tabled(rename = "Opacity")]
    opacity: String,
}

fn styled(mut table: Table) -> Table {
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN)); // Header color
    table
}

pub fn show_ranking(
    ranked: &[RankedPlayer],
    service: &RankingService,
    weights: &StatWeights,
    options: &RankingOptions,
    all_stats: bool,
) {
    if ranked.is_empty() {
        println!("No players match the selected positions.");
        return;
    }

    let columns: Vec<StatKey> = if all_stats {
        StatKey::ALL.to_vec()
    } else if weights.selected().is_empty() {
        FALLBACK_COLUMNS.to_vec()
    } else {
        weights.selected().to_vec()
    };

    let mode = if options.min_max { "Min/Max Sorting" } else { "Default Sorting" };
    let positions: Vec<&str> = options.positions.iter().map(|p| p.code()).collect();
    println!("\x1b[1;36m{}\x1b[0m  positions: {}", mode, positions.join(","));

    for key in weights.selected() {
        let weight = service.weight(*key, weights, options.weight_mode);
        match options.weight_mode {
            WeightMode::Manual => println!("  {:<7} x{}", key.short_form(), weight),
            WeightMode::Default => println!("  {:<7} x{:.6}", key.short_form(), weight),
        }
    }

    let mut builder = Builder::default();
    let mut header = vec!["#".to_string(), "Name".into(), "Team".into(), "Pos".into(), "Score".into()];
    header.extend(columns.iter().map(|k| k.short_form().to_string()));
    builder.push_record(header);

    for (i, row) in ranked.iter().enumerate() {
        let mut record = vec![
            (i + 1).to_string(),
            row.record.name.clone(),
            row.record.team.clone(),
            row.record.position.to_string(),
            format!("{:.4}", row.score),
        ];
        record.extend(
            columns
                .iter()
                .map(|k| format_value(*k, row.values.get(*k), options.min_max)),
        );
        builder.push_record(record);
    }

    let mut table = styled(builder.build());
    for (i, key) in columns.iter().enumerate() {
        if weights.is_selected(*key) {
            table.with(Modify::new(Columns::one(5 + i)).with(Color::BOLD | Color::FG_YELLOW));
        }
    }
    println!("{}", table);
}

fn summary_rows(summary: &RosterSummary) -> Vec<SummaryRow> {
    summary
        .values
        .iter()
        .map(|(key, value)| SummaryRow {
            stat: key.short_form().to_string(),
            value: value.to_string(),
        })
        .collect()
}

pub fn show_roster(roster: &Roster, mode: AggregateMode) {
    if roster.is_empty() {
        println!("Roster is empty.");
        return;
    }

    let mut builder = Builder::default();
    let mut header = vec!["Name".to_string(), "Team".into(), "Pos".into()];
    header.extend(StatKey::ALL.iter().map(|k| k.short_form().to_string()));
    builder.push_record(header);
    for entry in roster.entries() {
        let p = &entry.player;
        let mut record = vec![p.name.clone(), p.team.clone(), p.position.to_string()];
        record.extend(StatKey::ALL.iter().map(|k| format_value(*k, p.stat(*k), false)));
        builder.push_record(record);
    }
    println!("{}", styled(builder.build()));

    let summary = roster.summary(mode);
    println!("\n\x1b[1;36mTeam Stats\x1b[0m ({}, {} players)", mode, summary.count);
    println!("{}", styled(Table::new(summary_rows(&summary))));

    for key in roster.charted() {
        let points = roster.distribution(*key);
        let total: f64 = points.iter().map(|p| p.value).sum();
        let rows: Vec<ShareRow> = points
            .iter()
            .map(|p| ShareRow {
                name: p.name.clone(),
                value: format_value(*key, p.value, false),
                share: if total > 0.0 {
                    format!("{:.1}%", p.value / total * 100.0)
                } else {
                    "-".to_string()
                },
            })
            .collect();

        println!("\n\x1b[1;36m{}\x1b[0m", key.label());
        println!("{}", styled(Table::new(rows)));
    }
}

fn format_trade_value(value: f64, mode: AggregateMode) -> String {
    match mode {
        AggregateMode::Average => format!("{:.2}", value),
        AggregateMode::Total => format!("{}", value),
    }
}

fn series_rows(series: &[ChartSeries]) -> Vec<SeriesRow> {
    series
        .iter()
        .map(|s| SeriesRow {
            label: s.label.clone(),
            stack: s.stack.clone().unwrap_or_else(|| "-".to_string()),
            opacity: format!("{:.1}", s.opacity),
        })
        .collect()
}

pub fn show_trade(board: &TradeBoard, mode: AggregateMode) {
    let mut builder = Builder::default();
    builder.push_record(["Stat", "Team 1", "Team 2", "Edge"]);

    for cmp in board.compare(mode) {
        let edge = match cmp.edge {
            Edge::SideA => "◀ Team 1",
            Edge::SideB => "Team 2 ▶",
            Edge::Even => "",
        };
        builder.push_record([
            cmp.key.label(),
            format_trade_value(cmp.side_a, mode),
            format_trade_value(cmp.side_b, mode),
            edge.to_string(),
        ]);
    }

    println!("\x1b[1;36m{}\x1b[0m", mode);
    println!("{}", styled(builder.build()));

    println!("\n\x1b[1;36mChart series\x1b[0m");
    println!("{}", styled(Table::new(series_rows(&board.chart(mode)))));
}

pub fn show_search(players: &[&PlayerRecord]) {
    if players.is_empty() {
        println!("No players found.");
        return;
    }

    let rows: Vec<SearchRow> = players
        .iter()
        .map(|p| SearchRow {
            name: p.name.clone(),
            team: p.team.clone(),
            position: p.position.to_string(),
            points: p.points.to_string(),
            headshot: p.headshot_path(),
        })
        .collect();
    println!("{}", styled(Table::new(rows)));
}
