use anyhow::Result;
use puck_core::service::dto::ChartSeries;
use puck_core::{
    suggest, AggregateMode, PlayerRecord, PlayerRepository, Position, RankedPlayer,
    RankingOptions, RankingService, Roster, Side, StatKey, StatWeights, TradeBoard, WeightMode,
    TRADE_STATS,
};
use ratatui::widgets::TableState;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View {
    Rankings,
    Roster,
    Trade,
}

impl View {
    pub const ALL: [View; 3] = [View::Rankings, View::Roster, View::Trade];

    pub fn title(self) -> &'static str {
        match self {
            View::Rankings => "Rankings",
            View::Roster => "Roster",
            View::Trade => "Trade",
        }
    }

    pub fn index(self) -> usize {
        match self {
            View::Rankings => 0,
            View::Roster => 1,
            View::Trade => 2,
        }
    }
}

pub enum InputMode {
    Normal,
    Searching,
}

fn step(len: usize, current: Option<usize>, forward: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let i = match current {
        Some(i) if forward => {
            if i >= len - 1 { 0 } else { i + 1 }
        }
        Some(i) => {
            if i == 0 { len - 1 } else { i - 1 }
        }
        None => 0,
    };
    Some(i)
}

pub struct RankView {
    pub service: RankingService,
    pub weights: StatWeights,
    pub options: RankingOptions,
    pub stat_cursor: usize,
    pub state: TableState,
}

impl RankView {
    pub fn ranked(&self) -> Vec<RankedPlayer> {
        self.service.rank(&self.weights, &self.options)
    }

    pub fn current_stat(&self) -> StatKey {
        StatKey::ALL[self.stat_cursor]
    }
}

pub struct RosterView {
    pub roster: Roster,
    pub mode: AggregateMode,
    pub stat_cursor: usize,
    pub state: TableState,
}

impl RosterView {
    pub fn current_stat(&self) -> StatKey {
        StatKey::ALL[self.stat_cursor]
    }
}

pub struct TradeView {
    pub board: TradeBoard,
    pub mode: AggregateMode,
    pub active_side: Side,
    pub stat_cursor: usize,
    pub series_cursor: usize,
    pub state: TableState,
}

impl TradeView {
    pub fn current_stat(&self) -> StatKey {
        TRADE_STATS[self.stat_cursor]
    }

    pub fn series(&self) -> Vec<ChartSeries> {
        self.board.chart(self.mode)
    }
}

pub struct App {
    pub players: Vec<PlayerRecord>,
    pub view: View,
    pub input_mode: InputMode,
    pub input: String,
    pub cursor_position: usize,
    pub suggestion_index: usize,
    pub status: Option<String>,
    pub rank: RankView,
    pub roster: RosterView,
    pub trade: TradeView,
}

impl App {
    pub fn new<R: PlayerRepository>(repo: &R) -> Result<App> {
        let players = repo.list()?;
        let service = RankingService::from_players(players.clone());

        let mut rank_state = TableState::default();
        if !service.skaters().is_empty() {
            rank_state.select(Some(0));
        }

        Ok(App {
            players,
            view: View::Rankings,
            input_mode: InputMode::Normal,
            input: String::new(),
            cursor_position: 0,
            suggestion_index: 0,
            status: None,
            rank: RankView {
                service,
                weights: StatWeights::new(),
                options: RankingOptions::default(),
                stat_cursor: 0,
                state: rank_state,
            },
            roster: RosterView {
                roster: Roster::new(),
                mode: AggregateMode::Average,
                stat_cursor: 0,
                state: TableState::default(),
            },
            trade: TradeView {
                board: TradeBoard::new(),
                mode: AggregateMode::Total,
                active_side: Side::A,
                stat_cursor: 0,
                series_cursor: 0,
                state: TableState::default(),
            },
        })
    }

    pub fn next_view(&mut self) {
        let i = (self.view.index() + 1) % View::ALL.len();
        self.switch_view(View::ALL[i]);
    }

    pub fn previous_view(&mut self) {
        let i = (self.view.index() + View::ALL.len() - 1) % View::ALL.len();
        self.switch_view(View::ALL[i]);
    }

    fn switch_view(&mut self, view: View) {
        self.view = view;
        self.exit_input_mode();
        self.status = None;
    }

    // --- Row navigation ---

    fn rows_in_view(&self) -> usize {
        match self.view {
            View::Rankings => self.rank.ranked().len(),
            View::Roster => self.roster.roster.len(),
            View::Trade => self.trade.board.entries(self.trade.active_side).len(),
        }
    }

    fn state_mut(&mut self) -> &mut TableState {
        match self.view {
            View::Rankings => &mut self.rank.state,
            View::Roster => &mut self.roster.state,
            View::Trade => &mut self.trade.state,
        }
    }

    pub fn next(&mut self) {
        let len = self.rows_in_view();
        let state = self.state_mut();
        let i = step(len, state.selected(), true);
        state.select(i);
    }

    pub fn previous(&mut self) {
        let len = self.rows_in_view();
        let state = self.state_mut();
        let i = step(len, state.selected(), false);
        state.select(i);
    }

    // --- Statistic cursor (weights, roster charts, trade chart) ---

    pub fn next_stat(&mut self) {
        match self.view {
            View::Rankings => self.rank.stat_cursor = (self.rank.stat_cursor + 1) % StatKey::ALL.len(),
            View::Roster => self.roster.stat_cursor = (self.roster.stat_cursor + 1) % StatKey::ALL.len(),
            View::Trade => self.trade.stat_cursor = (self.trade.stat_cursor + 1) % TRADE_STATS.len(),
        }
    }

    pub fn previous_stat(&mut self) {
        match self.view {
            View::Rankings => {
                self.rank.stat_cursor = (self.rank.stat_cursor + StatKey::ALL.len() - 1) % StatKey::ALL.len()
            }
            View::Roster => {
                self.roster.stat_cursor = (self.roster.stat_cursor + StatKey::ALL.len() - 1) % StatKey::ALL.len()
            }
            View::Trade => {
                self.trade.stat_cursor = (self.trade.stat_cursor + TRADE_STATS.len() - 1) % TRADE_STATS.len()
            }
        }
    }

    // --- Rankings ---

    pub fn raise_weight(&mut self) {
        let key = self.rank.current_stat();
        self.rank.weights.increment(key);
        self.rank.state.select(Some(0));
    }

    pub fn lower_weight(&mut self) {
        let key = self.rank.current_stat();
        self.rank.weights.decrement(key);
        self.rank.state.select(Some(0));
    }

    pub fn toggle_min_max(&mut self) {
        self.rank.options.min_max = !self.rank.options.min_max;
    }

    pub fn toggle_weight_mode(&mut self) {
        self.rank.options.weight_mode = match self.rank.options.weight_mode {
            WeightMode::Manual => WeightMode::Default,
            WeightMode::Default => WeightMode::Manual,
        };
    }

    pub fn toggle_position(&mut self, index: usize) {
        if let Some(position) = Position::SKATERS.get(index) {
            self.rank.options.toggle_position(*position);
            let any = !self.rank.ranked().is_empty();
            self.rank.state.select(if any { Some(0) } else { None });
        }
    }

    // --- Roster and trade ---

    pub fn toggle_aggregate_mode(&mut self) {
        match self.view {
            View::Roster => self.roster.mode = self.roster.mode.toggled(),
            View::Trade => self.trade.mode = self.trade.mode.toggled(),
            View::Rankings => {}
        }
    }

    pub fn toggle_chart(&mut self) {
        let key = self.roster.current_stat();
        self.roster.roster.toggle_chart(key);
    }

    pub fn switch_side(&mut self) {
        self.trade.active_side = self.trade.active_side.other();
        let any = !self.trade.board.entries(self.trade.active_side).is_empty();
        self.trade.state.select(if any { Some(0) } else { None });
    }

    pub fn next_series(&mut self) {
        let len = self.trade.series().len();
        if len > 0 {
            self.trade.series_cursor = (self.trade.series_cursor + 1) % len;
        }
    }

    pub fn toggle_series(&mut self) {
        let series = self.trade.series();
        if let Some(s) = series.get(self.trade.series_cursor) {
            self.trade.board.toggle_series(&s.key);
        }
    }

    pub fn remove_selected(&mut self) {
        let result = match self.view {
            View::Roster => self.roster.state.selected().and_then(|i| {
                let id = self.roster.roster.entries().get(i)?.id;
                Some(self.roster.roster.remove(&id))
            }),
            View::Trade => self.trade.state.selected().and_then(|i| {
                let side = self.trade.active_side;
                let id = self.trade.board.entries(side).get(i)?.id;
                Some(self.trade.board.remove(side, &id))
            }),
            View::Rankings => None,
        };

        match result {
            Some(Ok(player)) => self.status = Some(format!("Removed {}", player.name)),
            Some(Err(e)) => self.status = Some(e.to_string()),
            None => return,
        }

        // Keep the selection inside the shrunken list.
        let len = self.rows_in_view();
        let state = self.state_mut();
        match state.selected() {
            _ if len == 0 => state.select(None),
            Some(i) if i >= len => state.select(Some(len - 1)),
            _ => {}
        }
        if self.view == View::Trade {
            self.trade.series_cursor = 0;
        }
    }

    // --- Search box ---

    pub fn suggestions(&self) -> Vec<&PlayerRecord> {
        suggest(&self.players, &self.input)
    }

    pub fn enter_search_mode(&mut self) {
        if self.view == View::Rankings {
            return;
        }
        self.input_mode = InputMode::Searching;
        self.input.clear();
        self.cursor_position = 0;
        self.suggestion_index = 0;
    }

    pub fn exit_input_mode(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input.clear();
        self.cursor_position = 0;
        self.suggestion_index = 0;
    }

    pub fn input_char(&mut self, c: char) {
        let byte_index = self.input.chars().take(self.cursor_position).map(|c| c.len_utf8()).sum();
        self.input.insert(byte_index, c);
        self.cursor_position += 1;
        self.suggestion_index = 0;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let byte_index: usize = self.input.chars().take(self.cursor_position - 1).map(|c| c.len_utf8()).sum();
            self.input.remove(byte_index);
            self.cursor_position -= 1;
            self.suggestion_index = 0;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    pub fn next_suggestion(&mut self) {
        let len = self.suggestions().len();
        if len > 0 {
            self.suggestion_index = (self.suggestion_index + 1) % len;
        }
    }

    pub fn previous_suggestion(&mut self) {
        let len = self.suggestions().len();
        if len > 0 {
            self.suggestion_index = (self.suggestion_index + len - 1) % len;
        }
    }

    /// Adds the highlighted suggestion to the roster or the active trade side.
    pub fn submit_search(&mut self) {
        let picked = self.suggestions().get(self.suggestion_index).map(|p| (*p).clone());
        let Some(player) = picked else {
            self.exit_input_mode();
            return;
        };

        let name = player.name.clone();
        match self.view {
            View::Roster => {
                self.roster.roster.add(player);
                let last = self.roster.roster.len() - 1;
                self.roster.state.select(Some(last));
                self.status = Some(format!("Added {} to team", name));
            }
            View::Trade => {
                let side = self.trade.active_side;
                self.trade.board.add(side, player);
                let last = self.trade.board.entries(side).len() - 1;
                self.trade.state.select(Some(last));
                self.status = Some(format!("Added {} to {}", name, side));
            }
            View::Rankings => {}
        }
        self.exit_input_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use puck_core::FilePlayerRepository;

    fn app() -> App {
        App::new(&FilePlayerRepository::bundled().unwrap()).unwrap()
    }

    fn search(app: &mut App, text: &str) {
        app.enter_search_mode();
        for c in text.chars() {
            app.input_char(c);
        }
        app.submit_search();
    }

    #[test]
    fn test_step_wraps() {
        assert_eq!(step(0, Some(3), true), None);
        assert_eq!(step(3, None, true), Some(0));
        assert_eq!(step(3, Some(2), true), Some(0));
        assert_eq!(step(3, Some(0), false), Some(2));
    }

    #[test]
    fn test_views_cycle_and_keep_state() {
        let mut app = app();
        app.rank.weights.set(StatKey::Hits, 4);

        app.next_view();
        assert_eq!(app.view, View::Roster);
        search(&mut app, "mcdavid");
        assert_eq!(app.roster.roster.len(), 1);

        app.next_view();
        app.next_view();
        assert_eq!(app.view, View::Rankings);
        assert!(app.rank.weights.is_selected(StatKey::Hits));
        app.previous_view();
        assert_eq!(app.view, View::Trade);
        assert_eq!(app.roster.roster.len(), 1);
        assert!(app.trade.board.entries(Side::A).is_empty());
    }

    #[test]
    fn test_search_adds_to_active_side_and_remove() {
        let mut app = app();
        app.next_view();
        app.next_view();
        assert_eq!(app.view, View::Trade);

        search(&mut app, "pastrnak");
        app.switch_side();
        search(&mut app, "kucherov");
        assert_eq!(app.trade.board.entries(Side::A)[0].player.name, "David Pastrnak");
        assert_eq!(app.trade.board.entries(Side::B)[0].player.name, "Nikita Kucherov");

        app.remove_selected();
        assert!(app.trade.board.entries(Side::B).is_empty());
        assert_eq!(app.trade.state.selected(), None);
        assert_eq!(app.trade.board.entries(Side::A).len(), 1);
    }

    #[test]
    fn test_search_without_match_adds_nothing() {
        let mut app = app();
        app.next_view();
        search(&mut app, "zzzz");
        assert!(app.roster.roster.is_empty());
        assert!(matches!(app.input_mode, InputMode::Normal));
    }

    #[test]
    fn test_rankings_are_recomputed_from_weights() {
        let mut app = app();
        app.rank.stat_cursor = StatKey::Hits.index();
        app.raise_weight();
        let ranked = app.rank.ranked();
        let top_hits = ranked[0].record.hits;
        assert!(ranked.iter().all(|r| r.record.hits <= top_hits));

        app.lower_weight();
        assert!(app.rank.weights.selected().is_empty());
    }
}
