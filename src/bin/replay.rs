use anyhow::{Result, anyhow};

use courtside_score::config::parse_match_over;
use courtside_score::engine::{MatchOverPolicy, MatchState, Player, PointOutcome};

// Replays a rally string such as "AABBA" against a fresh board and prints
// every game, set and match resolution.
fn main() -> Result<()> {
    let rallies = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow!("usage: replay <rallies e.g. AABAB> [restart|hold]"))?;
    let policy = match std::env::args().nth(2) {
        Some(raw) => {
            parse_match_over(&raw).ok_or_else(|| anyhow!("unknown match-over policy: {raw}"))?
        }
        None => MatchOverPolicy::default(),
    };

    let mut state = MatchState::with_policy(policy);
    for (i, ch) in rallies.chars().filter(|c| !c.is_whitespace()).enumerate() {
        let player = match ch.to_ascii_uppercase() {
            'A' => Player::A,
            'B' => Player::B,
            other => return Err(anyhow!("rally {}: expected A or B, got {other:?}", i + 1)),
        };
        match state.point(player) {
            PointOutcome::Point => {}
            PointOutcome::Ignored => println!("#{:<4} ignored, match is over", i + 1),
            PointOutcome::Game(p) => println!("#{:<4} game {:?}", i + 1, p),
            PointOutcome::Set(p) => println!("#{:<4} set {:?}", i + 1, p),
            PointOutcome::Match(p) => println!("#{:<4} match {:?}", i + 1, p),
        }
    }

    println!(
        "points {}-{} ({}-{}) games {}-{} sets {}-{} server {:?} history {}",
        state.point_a,
        state.point_b,
        state.point_label_a(),
        state.point_label_b(),
        state.games_a,
        state.games_b,
        state.sets_a,
        state.sets_b,
        state.server,
        state.history().len()
    );
    Ok(())
}
