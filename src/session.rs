use std::collections::VecDeque;
use std::sync::mpsc;

use crate::config::SessionConfig;
use crate::engine::{MatchState, Player, PointOutcome};
use crate::persist::{self, ScoreStore};

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Point(Player),
    Undo,
    Reset,
    StartNextMatch,
    SetServer(Player),
    ToggleServer,
    Rename { player: Player, name: String },
}

/// Everything the scoreboard needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreView {
    pub player_a_name: String,
    pub player_b_name: String,
    pub point_label_a: &'static str,
    pub point_label_b: &'static str,
    pub games_a: u32,
    pub games_b: u32,
    pub sets_a: u32,
    pub sets_b: u32,
    pub server: Player,
    pub can_undo: bool,
    pub match_over: bool,
}

impl ScoreView {
    pub fn of(state: &MatchState) -> Self {
        Self {
            player_a_name: state.player_a_name.clone(),
            player_b_name: state.player_b_name.clone(),
            point_label_a: state.point_label_a(),
            point_label_b: state.point_label_b(),
            games_a: state.games_a,
            games_b: state.games_b,
            sets_a: state.sets_a,
            sets_b: state.sets_b,
            server: state.server,
            can_undo: state.can_undo(),
            match_over: state.match_over,
        }
    }
}

pub struct Session<S: ScoreStore> {
    pub state: MatchState,
    pub logs: VecDeque<String>,
    store: S,
    subscribers: Vec<mpsc::Sender<ScoreView>>,
}

impl<S: ScoreStore> Session<S> {
    pub fn open(store: S, config: &SessionConfig) -> Self {
        let mut state = MatchState::with_policy(config.match_over);
        state.player_a_name = config.player_a_name.clone();
        state.player_b_name = config.player_b_name.clone();

        let mut session = Self {
            state,
            logs: VecDeque::with_capacity(MAX_LOGS),
            store,
            subscribers: Vec::new(),
        };
        match persist::load_state(&session.store) {
            Some(saved) => {
                saved.apply_to(&mut session.state);
                session.push_log("[INFO] Restored saved match");
            }
            None => session.push_log("[INFO] Starting a new match"),
        }
        session
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn view(&self) -> ScoreView {
        ScoreView::of(&self.state)
    }

    pub fn subscribe(&mut self) -> mpsc::Receiver<ScoreView> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Write-through of the whole record. A failed write only gets logged.
    pub fn save(&mut self) {
        if let Err(err) = persist::save_state(&mut self.store, &self.state) {
            tracing::warn!("failed to save score: {err:#}");
            self.push_log(format!("[WARN] Save failed: {err}"));
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    fn notify(&mut self) {
        let view = self.view();
        self.subscribers.retain(|tx| tx.send(view.clone()).is_ok());
    }
}

/// Runs one command against the session. Returns whether the board changed;
/// only changes are saved and broadcast.
pub fn apply_command<S: ScoreStore>(session: &mut Session<S>, command: Command) -> bool {
    let changed = match command {
        Command::Point(player) => match session.state.point(player) {
            PointOutcome::Ignored => false,
            PointOutcome::Match(winner) => {
                let name = session.state.player_name(winner).to_string();
                session.push_log(format!("[INFO] Match to {name}"));
                true
            }
            _ => true,
        },
        Command::Undo => session.state.undo(),
        Command::Reset => {
            session.state.reset();
            true
        }
        Command::StartNextMatch => {
            session.state.start_next_match();
            true
        }
        Command::SetServer(player) => {
            session.state.set_server(player);
            true
        }
        Command::ToggleServer => {
            session.state.toggle_server();
            true
        }
        Command::Rename { player, name } => {
            session.state.set_player_name(player, name);
            true
        }
    };
    if changed {
        session.save();
        session.notify();
    }
    changed
}
