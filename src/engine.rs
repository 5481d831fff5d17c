use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

pub const POINTS_TO_WIN_GAME: u32 = 4;
pub const GAMES_TO_WIN_SET: u32 = 6;
pub const SETS_TO_WIN_MATCH: u32 = 6;
pub const WIN_MARGIN: u32 = 2;
pub const HISTORY_LIMIT: usize = 25;

pub const DEFAULT_PLAYER_A_NAME: &str = "Player A";
pub const DEFAULT_PLAYER_B_NAME: &str = "Player B";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    #[default]
    A,
    B,
}

impl Player {
    pub fn other(self) -> Self {
        match self {
            Player::A => Player::B,
            Player::B => Player::A,
        }
    }
}

/// What happens once a player takes the deciding set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchOverPolicy {
    /// Wipe the board and start a fresh match inside the same `point` call.
    #[default]
    RestartImmediately,
    /// Keep the final set tally on screen with `match_over` set until
    /// `start_next_match` is called.
    HoldUntilNextMatch,
}

/// Deepest level a single `point` call resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointOutcome {
    Ignored,
    Point,
    Game(Player),
    Set(Player),
    Match(Player),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub point_a: u32,
    pub point_b: u32,
    pub games_a: u32,
    pub games_b: u32,
    pub sets_a: u32,
    pub sets_b: u32,
    pub server: Player,
    pub match_over: bool,
}

impl Snapshot {
    /// True when nothing in the snapshot is still waiting to resolve: no
    /// finished game or set left on the board, and a won match only while
    /// `match_over` holds it.
    pub fn is_settled(&self) -> bool {
        leader(self.point_a, self.point_b, POINTS_TO_WIN_GAME).is_none()
            && leader(self.games_a, self.games_b, GAMES_TO_WIN_SET).is_none()
            && (self.match_over || leader(self.sets_a, self.sets_b, SETS_TO_WIN_MATCH).is_none())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchState {
    pub point_a: u32,
    pub point_b: u32,
    pub games_a: u32,
    pub games_b: u32,
    pub sets_a: u32,
    pub sets_b: u32,
    pub server: Player,
    pub match_over: bool,
    pub player_a_name: String,
    pub player_b_name: String,
    pub policy: MatchOverPolicy,
    history: VecDeque<Snapshot>,
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchState {
    pub fn new() -> Self {
        Self {
            point_a: 0,
            point_b: 0,
            games_a: 0,
            games_b: 0,
            sets_a: 0,
            sets_b: 0,
            server: Player::A,
            match_over: false,
            player_a_name: DEFAULT_PLAYER_A_NAME.to_string(),
            player_b_name: DEFAULT_PLAYER_B_NAME.to_string(),
            policy: MatchOverPolicy::default(),
            history: VecDeque::with_capacity(HISTORY_LIMIT + 1),
        }
    }

    pub fn with_policy(policy: MatchOverPolicy) -> Self {
        Self {
            policy,
            ..Self::new()
        }
    }

    pub fn point(&mut self, to: Player) -> PointOutcome {
        if self.match_over {
            return PointOutcome::Ignored;
        }
        self.push_history();
        match to {
            Player::A => self.point_a = self.point_a.saturating_add(1),
            Player::B => self.point_b = self.point_b.saturating_add(1),
        }
        self.resolve_point()
    }

    /// Pops one snapshot. Names are never part of a snapshot and stay as they are.
    pub fn undo(&mut self) -> bool {
        let Some(last) = self.history.pop_back() else {
            return false;
        };
        self.restore(last);
        true
    }

    pub fn reset(&mut self) {
        self.clear_scores();
        self.history.clear();
    }

    pub fn start_next_match(&mut self) {
        self.reset();
    }

    pub fn set_server(&mut self, player: Player) {
        self.server = player;
    }

    pub fn toggle_server(&mut self) {
        self.server = self.server.other();
    }

    pub fn set_player_name(&mut self, player: Player, name: impl Into<String>) {
        match player {
            Player::A => self.player_a_name = name.into(),
            Player::B => self.player_b_name = name.into(),
        }
    }

    pub fn player_name(&self, player: Player) -> &str {
        match player {
            Player::A => &self.player_a_name,
            Player::B => &self.player_b_name,
        }
    }

    pub fn points(&self, player: Player) -> u32 {
        match player {
            Player::A => self.point_a,
            Player::B => self.point_b,
        }
    }

    pub fn games(&self, player: Player) -> u32 {
        match player {
            Player::A => self.games_a,
            Player::B => self.games_b,
        }
    }

    pub fn sets(&self, player: Player) -> u32 {
        match player {
            Player::A => self.sets_a,
            Player::B => self.sets_b,
        }
    }

    pub fn point_label(&self, player: Player) -> &'static str {
        point_label(self.points(player), self.points(player.other()))
    }

    pub fn point_label_a(&self) -> &'static str {
        self.point_label(Player::A)
    }

    pub fn point_label_b(&self) -> &'static str {
        self.point_label(Player::B)
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn history(&self) -> &VecDeque<Snapshot> {
        &self.history
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            point_a: self.point_a,
            point_b: self.point_b,
            games_a: self.games_a,
            games_b: self.games_b,
            sets_a: self.sets_a,
            sets_b: self.sets_b,
            server: self.server,
            match_over: self.match_over,
        }
    }

    /// Replaces the scoring fields and the undo stack wholesale, e.g. from a
    /// persisted record. Keeps only the newest `HISTORY_LIMIT` snapshots.
    pub fn load_scores(&mut self, current: Snapshot, history: impl IntoIterator<Item = Snapshot>) {
        self.restore(current);
        self.history = history.into_iter().collect();
        while self.history.len() > HISTORY_LIMIT {
            self.history.pop_front();
        }
    }

    fn restore(&mut self, snap: Snapshot) {
        self.point_a = snap.point_a;
        self.point_b = snap.point_b;
        self.games_a = snap.games_a;
        self.games_b = snap.games_b;
        self.sets_a = snap.sets_a;
        self.sets_b = snap.sets_b;
        self.server = snap.server;
        self.match_over = snap.match_over;
    }

    fn clear_scores(&mut self) {
        self.restore(Snapshot::default());
    }

    fn push_history(&mut self) {
        self.history.push_back(self.snapshot());
        while self.history.len() > HISTORY_LIMIT {
            self.history.pop_front();
        }
    }

    fn resolve_point(&mut self) -> PointOutcome {
        let Some(winner) = leader(self.point_a, self.point_b, POINTS_TO_WIN_GAME) else {
            return PointOutcome::Point;
        };
        self.point_a = 0;
        self.point_b = 0;
        match winner {
            Player::A => self.games_a = self.games_a.saturating_add(1),
            Player::B => self.games_b = self.games_b.saturating_add(1),
        }
        self.toggle_server();
        self.resolve_game().unwrap_or(PointOutcome::Game(winner))
    }

    fn resolve_game(&mut self) -> Option<PointOutcome> {
        let winner = leader(self.games_a, self.games_b, GAMES_TO_WIN_SET)?;
        self.games_a = 0;
        self.games_b = 0;
        match winner {
            Player::A => self.sets_a = self.sets_a.saturating_add(1),
            Player::B => self.sets_b = self.sets_b.saturating_add(1),
        }
        Some(self.resolve_set().unwrap_or(PointOutcome::Set(winner)))
    }

    fn resolve_set(&mut self) -> Option<PointOutcome> {
        let winner = leader(self.sets_a, self.sets_b, SETS_TO_WIN_MATCH)?;
        match self.policy {
            MatchOverPolicy::RestartImmediately => self.reset(),
            MatchOverPolicy::HoldUntilNextMatch => self.match_over = true,
        }
        Some(PointOutcome::Match(winner))
    }
}

/// Tennis label for `point` given the opponent's raw count.
pub fn point_label(point: u32, opponent: u32) -> &'static str {
    if point >= 3 && opponent >= 3 {
        return if point > opponent { "AD" } else { "40" };
    }
    match point {
        0 => "0",
        1 => "15",
        2 => "30",
        _ => "40",
    }
}

// Someone has reached `target` and leads by at least the margin.
fn leader(a: u32, b: u32, target: u32) -> Option<Player> {
    if a < target && b < target {
        return None;
    }
    if a.saturating_sub(b) >= WIN_MARGIN {
        Some(Player::A)
    } else if b.saturating_sub(a) >= WIN_MARGIN {
        Some(Player::B)
    } else {
        None
    }
}
