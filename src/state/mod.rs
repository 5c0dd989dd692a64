//! Immutable game snapshots and the pure transitions that derive them.
//!
//! One `GameState` exists per processed event. A transition never mutates
//! its predecessor: it clones, edits the clone, and returns it, so every
//! snapshot another reference may observe stays frozen. Legality questions
//! are answered by the oracle before an event is even constructed; the
//! machine is told what happened and only checks the preconditions whose
//! violation proves the log corrupt.

mod transitions;

use crate::observation::PlayerState;
use crate::oracle::{self, RunPosition};
use crate::tile::TILE_KINDS;

/// A claimed or declared tile group, stored as kinds. Triplets and runs
/// hold three, quads four.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meld {
    pub tiles: Vec<u8>,
}

/// Tag of the transition that produced a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LastAction {
    #[default]
    None,
    Discard {
        seat: u8,
        tile: u8,
    },
    Riichi {
        seat: u8,
    },
    Call {
        seat: u8,
        tiles: Vec<u8>,
    },
}

#[derive(Debug, Clone)]
pub struct GameState {
    /// Concealed hands as ascending tile kinds, length 13 except between a
    /// draw and its resolving discard/call/kan.
    pub hands: [Vec<u8>; 4],
    /// Kinds whose red copy is currently held, per seat. Feature-encoding
    /// data only, never rule logic.
    pub red_fives: [Vec<u8>; 4],
    pub discards: [Vec<u8>; 4],
    pub melds: [Vec<Meld>; 4],
    pub dora_indicators: Vec<u8>,
    pub riichi: [bool; 4],
    pub scores: [i32; 4],
    /// Round index, 0-7.
    pub round: u8,
    pub dealer: u8,
    /// Seat and kind of the most recent discard.
    pub last_discard: Option<(u8, u8)>,
    pub last_action: LastAction,
    pub finished: bool,
    pub gains: Option<[i32; 4]>,
}

impl GameState {
    /// A triplet claim on `discarded` is legal for `seat`.
    pub fn can_claim_triplet(&self, seat: u8, discarded: u8) -> bool {
        oracle::can_claim_triplet(&self.hands[seat as usize], discarded)
    }

    /// Every run position `seat` could complete with `discarded`.
    pub fn run_claims(&self, seat: u8, discarded: u8) -> Vec<RunPosition> {
        oracle::run_claims(&self.hands[seat as usize], discarded)
    }

    /// Riichi is gated on tenpai of the freshly drawn 14-tile hand. The
    /// oracle's hard length guard also rejects any open-melded hand, which
    /// can never hold 14 tiles.
    pub fn can_declare_riichi(&self, seat: u8) -> bool {
        oracle::is_tenpai(&self.hands[seat as usize])
    }

    /// Per-kind tile count across hands, discards, melds and dora
    /// indicators. Never exceeds 4 per kind for a well-formed log.
    pub fn kind_counts(&self) -> [u8; TILE_KINDS] {
        let mut counts = [0u8; TILE_KINDS];
        let mut bump = |kind: u8| counts[kind as usize] += 1;
        for seat in 0..4 {
            for &t in &self.hands[seat] {
                bump(t);
            }
            for &t in &self.discards[seat] {
                bump(t);
            }
            for meld in &self.melds[seat] {
                for &t in &meld.tiles {
                    bump(t);
                }
            }
        }
        for &t in &self.dora_indicators {
            bump(t);
        }
        counts
    }

    /// Prevailing wind index: East for rounds 0-3, South afterwards.
    pub fn round_wind(&self) -> u8 {
        if self.round < 4 { 0 } else { 1 }
    }

    /// Seat wind index relative to the dealer.
    pub fn seat_wind(&self, seat: u8) -> u8 {
        (seat + 4 - self.dealer) % 4
    }

    /// Position of `seat` in the ascending-score ordering, ties broken by
    /// seat index.
    pub fn rank(&self, seat: u8) -> u8 {
        let mut order: Vec<u8> = (0..4).collect();
        order.sort_by_key(|&s| self.scores[s as usize]);
        order.iter().position(|&s| s == seat).unwrap() as u8
    }

    /// Perspective-rotated view for one seat, optionally chained to the
    /// view of a prior snapshot for temporal-delta encoding.
    pub fn player_view<'a>(
        &'a self,
        seat: u8,
        prev: Option<&'a PlayerState<'a>>,
    ) -> PlayerState<'a> {
        PlayerState::rotated(self, seat, prev)
    }

    fn total_meld_copies(&self, seat: usize, kind: u8) -> usize {
        self.melds[seat]
            .iter()
            .flat_map(|m| m.tiles.iter())
            .filter(|&&t| t == kind)
            .count()
    }
}
