//! Folds an ordered event stream into per-round snapshot sequences.
//!
//! The driver never inspects tile values; it sequences events, keeps the
//! current snapshot chain, and buffers one snapshot per externally-visible
//! event. `Init` and `DoraReveal` advance the state without producing a
//! snapshot. On `Finish` the buffered round is handed back to the caller
//! and the buffer cleared, so a malformed later round never invalidates
//! rounds already delivered.

use rayon::prelude::*;
use tracing::debug;

use crate::errors::{ReplayError, ReplayResult};
use crate::event::Event;
use crate::state::GameState;

#[derive(Debug, Default)]
pub struct ReplayDriver {
    state: Option<GameState>,
    snapshots: Vec<GameState>,
}

impl ReplayDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// The snapshot produced by the most recent event, if any round is in
    /// flight.
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    /// Snapshots buffered for the round in flight.
    pub fn snapshots(&self) -> &[GameState] {
        &self.snapshots
    }

    /// Apply one event. Returns the complete snapshot sequence of the
    /// round when the event is `Finish`.
    pub fn push(&mut self, event: &Event) -> ReplayResult<Option<Vec<GameState>>> {
        debug!(event = event.name(), "apply");
        let next = match &self.state {
            Some(state) => state.apply(event)?,
            None => match event {
                Event::Init {
                    hands,
                    dora_indicator,
                    scores,
                    round,
                    dealer,
                } => GameState::init(hands, *dora_indicator, *scores, *round, *dealer),
                other => {
                    return Err(ReplayError::MissingInit {
                        event: other.name().to_owned(),
                    });
                }
            },
        };

        if !matches!(event, Event::Init { .. } | Event::DoraReveal { .. }) {
            self.snapshots.push(next.clone());
        }
        let finished = matches!(event, Event::Finish { .. });
        self.state = Some(next);

        if finished {
            let round = std::mem::take(&mut self.snapshots);
            debug!(snapshots = round.len(), "round finished");
            return Ok(Some(round));
        }
        Ok(None)
    }

    /// Apply one serialized event record (one JSONL line).
    pub fn push_json(&mut self, line: &str) -> ReplayResult<Option<Vec<GameState>>> {
        let event: Event =
            serde_json::from_str(line).map_err(|e| ReplayError::MalformedEvent {
                message: format!("unparseable event record: {}", e),
            })?;
        self.push(&event)
    }
}

/// Fold a whole event stream into per-round snapshot sequences.
pub fn replay<'a, I>(events: I) -> ReplayResult<Vec<Vec<GameState>>>
where
    I: IntoIterator<Item = &'a Event>,
{
    let mut driver = ReplayDriver::new();
    let mut rounds = Vec::new();
    for event in events {
        if let Some(round) = driver.push(event)? {
            rounds.push(round);
        }
    }
    Ok(rounds)
}

/// Replay many independent games in parallel. Snapshots are immutable and
/// each pipeline owns its own chain, so no synchronization is involved.
pub fn replay_games_parallel(games: &[Vec<Event>]) -> Vec<ReplayResult<Vec<Vec<GameState>>>> {
    games.par_iter().map(|events| replay(events)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_event() -> Event {
        Event::Init {
            hands: [
                (0u8..13).collect(),
                (13u8..26).collect(),
                (26u8..39).collect(),
                (39u8..52).collect(),
            ],
            dora_indicator: 100,
            scores: [25000; 4],
            round: 0,
            dealer: 0,
        }
    }

    #[test]
    fn events_before_init_are_rejected() {
        let mut driver = ReplayDriver::new();
        let err = driver.push(&Event::Draw { seat: 0, tile: 52 }).unwrap_err();
        assert!(matches!(err, ReplayError::MissingInit { .. }));
    }

    #[test]
    fn init_and_dora_produce_no_snapshot() {
        let mut driver = ReplayDriver::new();
        driver.push(&init_event()).unwrap();
        assert!(driver.snapshots().is_empty());
        driver.push(&Event::DoraReveal { tile: 104 }).unwrap();
        assert!(driver.snapshots().is_empty());
        assert_eq!(driver.state().unwrap().dora_indicators, vec![25, 26]);
        driver.push(&Event::Draw { seat: 0, tile: 52 }).unwrap();
        assert_eq!(driver.snapshots().len(), 1);
    }

    #[test]
    fn finish_flushes_the_round_buffer() {
        let mut driver = ReplayDriver::new();
        driver.push(&init_event()).unwrap();
        driver.push(&Event::Draw { seat: 0, tile: 52 }).unwrap();
        driver.push(&Event::Discard { seat: 0, tile: 52 }).unwrap();
        let round = driver
            .push(&Event::Finish {
                scores: [26000, 25000, 25000, 24000],
                gains: [1000, 0, 0, -1000],
            })
            .unwrap()
            .expect("finish returns the round");
        assert_eq!(round.len(), 3);
        assert!(round.last().unwrap().finished);
        assert!(driver.snapshots().is_empty());
    }

    #[test]
    fn malformed_discard_aborts_the_round() {
        let mut driver = ReplayDriver::new();
        driver.push(&init_event()).unwrap();
        // Kind 20 (instance 80) was never dealt to seat 0.
        let err = driver
            .push(&Event::Discard { seat: 0, tile: 80 })
            .unwrap_err();
        assert!(matches!(err, ReplayError::MalformedEvent { .. }));
    }

    #[test]
    fn json_lines_drive_the_same_fold() {
        let mut driver = ReplayDriver::new();
        driver.push(&init_event()).unwrap();
        driver
            .push_json(r#"{"type":"draw","seat":1,"tile":52}"#)
            .unwrap();
        assert_eq!(driver.state().unwrap().hands[1].len(), 14);
        let err = driver.push_json("not an event").unwrap_err();
        assert!(matches!(err, ReplayError::MalformedEvent { .. }));
    }

    #[test]
    fn parallel_batch_matches_sequential() {
        let events = vec![
            init_event(),
            Event::Draw { seat: 0, tile: 52 },
            Event::Discard { seat: 0, tile: 52 },
            Event::Finish {
                scores: [25000; 4],
                gains: [0; 4],
            },
        ];
        let games = vec![events.clone(), events.clone()];
        let results = replay_games_parallel(&games);
        assert_eq!(results.len(), 2);
        for result in results {
            let rounds = result.unwrap();
            assert_eq!(rounds.len(), 1);
            assert_eq!(rounds[0].len(), 3);
        }
    }
}
