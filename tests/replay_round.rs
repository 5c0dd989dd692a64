//! Replays a full synthetic round end to end and checks the snapshot
//! sequence, the per-seat score round trip, and the invariants every
//! snapshot must satisfy.

use anyhow::Result;
use riichi_replay::event::{CallType, Event, KanType};
use riichi_replay::observation::{NUM_PLANES, PLANE_COPIES, PLANE_KINDS};
use riichi_replay::replay::{ReplayDriver, replay};
use riichi_replay::state::LastAction;

const START_SCORES: [i32; 4] = [25000; 4];
const GAINS: [i32; 4] = [4900, -1300, -1300, -2300];

fn deal() -> [Vec<u8>; 4] {
    [
        // 111m 222m 333m 444m 5m
        vec![4, 5, 6, 8, 9, 10, 12, 13, 14, 17, 18, 19, 20],
        // 5m5m 111p 222p 333p 4p4p
        vec![22, 23, 36, 37, 38, 40, 41, 42, 44, 45, 46, 48, 49],
        // 5555p (incl. red) 6666p 7777p 8p
        vec![52, 53, 54, 55, 56, 57, 58, 59, 60, 61, 62, 63, 64],
        // 9999p 1111s 2222s 3s
        vec![68, 69, 70, 71, 72, 73, 74, 75, 76, 77, 78, 79, 80],
    ]
}

fn round_events() -> Vec<Event> {
    let final_scores: [i32; 4] = std::array::from_fn(|i| START_SCORES[i] + GAINS[i]);
    vec![
        Event::Init {
            hands: deal(),
            dora_indicator: 132,
            scores: START_SCORES,
            round: 0,
            dealer: 0,
        },
        Event::Draw { seat: 0, tile: 21 },
        Event::Riichi { seat: 0, step: 1 },
        Event::Discard { seat: 0, tile: 21 },
        Event::Riichi { seat: 0, step: 2 },
        Event::Call {
            caller: 1,
            source: 0,
            call_type: CallType::Triplet,
            tiles: vec![21, 22, 23],
        },
        Event::Discard { seat: 1, tile: 44 },
        Event::Draw { seat: 2, tile: 65 },
        Event::Kan {
            seat: 2,
            subtype: KanType::Concealed,
            tiles: vec![56, 57, 58, 59],
        },
        Event::DoraReveal { tile: 104 },
        Event::Draw { seat: 2, tile: 84 },
        Event::Discard { seat: 2, tile: 84 },
        Event::Draw { seat: 3, tile: 128 },
        Event::Discard { seat: 3, tile: 128 },
        Event::Finish {
            scores: final_scores,
            gains: GAINS,
        },
    ]
}

#[test]
fn one_snapshot_per_visible_event() -> Result<()> {
    let events = round_events();
    let rounds = replay(&events)?;
    assert_eq!(rounds.len(), 1);
    // Init and DoraReveal advance state without buffering a snapshot.
    assert_eq!(rounds[0].len(), events.len() - 2);
    Ok(())
}

#[test]
fn finish_scores_round_trip_from_gains() -> Result<()> {
    let rounds = replay(&round_events())?;
    let last = rounds[0].last().unwrap();
    assert!(last.finished);
    assert_eq!(last.gains, Some(GAINS));
    for seat in 0..4 {
        assert_eq!(last.scores[seat], START_SCORES[seat] + GAINS[seat]);
    }
    Ok(())
}

#[test]
fn every_snapshot_satisfies_conservation() -> Result<()> {
    let rounds = replay(&round_events())?;
    for (i, snapshot) in rounds[0].iter().enumerate() {
        for (kind, &count) in snapshot.kind_counts().iter().enumerate() {
            assert!(
                count <= 4,
                "snapshot {}: kind {} appears {} times",
                i,
                kind,
                count
            );
        }
    }
    Ok(())
}

#[test]
fn discards_leave_hands_sorted() -> Result<()> {
    let rounds = replay(&round_events())?;
    for snapshot in &rounds[0] {
        if let LastAction::Discard { seat, .. } = snapshot.last_action {
            let hand = &snapshot.hands[seat as usize];
            assert!(hand.windows(2).all(|w| w[0] <= w[1]));
            assert_eq!(hand.len(), 13 - 3 * snapshot.melds[seat as usize].len());
        }
    }
    Ok(())
}

#[test]
fn round_state_accumulates_as_replayed() -> Result<()> {
    let rounds = replay(&round_events())?;
    let last = rounds[0].last().unwrap();
    assert!(last.riichi[0]);
    assert_eq!(last.melds[1][0].tiles, vec![5, 5, 5]);
    assert_eq!(last.melds[2][0].tiles, vec![14, 14, 14, 14]);
    assert_eq!(last.dora_indicators, vec![33, 26]);
    // The claimed 5m left seat 0's pile; later discards remain.
    assert!(last.discards[0].is_empty());
    assert_eq!(last.discards[1], vec![11]);
    assert_eq!(last.discards[2], vec![21]);
    assert_eq!(last.discards[3], vec![32]);
    Ok(())
}

#[test]
fn temporal_views_encode_against_the_prior_snapshot() -> Result<()> {
    let rounds = replay(&round_events())?;
    let round = &rounds[0];
    let prev = round[round.len() - 2].player_view(1, None);
    let view = round[round.len() - 1].player_view(1, Some(&prev));
    let planes = view.encode();
    assert_eq!(planes.len(), NUM_PLANES * PLANE_KINDS * PLANE_COPIES);
    // Own-hand plane and its temporal copy agree for seat 1, whose hand
    // did not change across the last event.
    let plane = |p: usize, k: usize, c: usize| planes[(p * PLANE_KINDS + k) * PLANE_COPIES + c];
    for kind in 0..PLANE_KINDS {
        for copy in 0..PLANE_COPIES {
            assert_eq!(plane(0, kind, copy), plane(29, kind, copy));
        }
    }
    Ok(())
}

#[test]
fn malformed_second_round_leaves_first_round_intact() -> Result<()> {
    let mut driver = ReplayDriver::new();
    let mut first_round = None;
    for event in &round_events() {
        if let Some(round) = driver.push(event)? {
            first_round = Some(round);
        }
    }
    let first_round = first_round.expect("first round finished");

    driver.push(&Event::Init {
        hands: deal(),
        dora_indicator: 132,
        scores: [25000; 4],
        round: 1,
        dealer: 1,
    })?;
    // Seat 0 never held 9s in the new deal.
    let err = driver.push(&Event::Discard { seat: 0, tile: 107 });
    assert!(err.is_err());

    assert_eq!(first_round.len(), round_events().len() - 2);
    assert!(first_round.last().unwrap().finished);
    Ok(())
}
