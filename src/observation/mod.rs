//! Perspective-rotated state views and their feature-plane encoding.
//!
//! A `PlayerState` borrows from the snapshot that produced it (and
//! optionally from one prior view for temporal deltas); nothing is copied
//! until `encode` writes the plane stack.

mod encode;
mod helpers;

use crate::state::{GameState, Meld};

/// Number of boolean feature planes produced by [`PlayerState::encode`].
pub const NUM_PLANES: usize = 43;
/// Each plane is 34 kinds by 4 copy slots.
pub const PLANE_KINDS: usize = 34;
pub const PLANE_COPIES: usize = 4;

/// One seat's view of a snapshot: piles, flags and winds rotated so the
/// viewing seat comes first, plus computed rank. The optional back-link to
/// a prior view is a plain shared borrow of an already-immutable value.
#[derive(Debug, Clone)]
pub struct PlayerState<'a> {
    pub seat: u8,
    pub hand: &'a [u8],
    pub red_fives: &'a [u8],
    pub discards: [&'a [u8]; 4],
    pub melds: [&'a [Meld]; 4],
    pub dora_indicators: &'a [u8],
    pub riichi: [bool; 4],
    /// Position in the ascending-score ordering.
    pub rank: u8,
    pub round: u8,
    pub round_wind: u8,
    pub own_wind: u8,
    pub prev: Option<&'a PlayerState<'a>>,
}

impl<'a> PlayerState<'a> {
    pub(crate) fn rotated(
        state: &'a GameState,
        seat: u8,
        prev: Option<&'a PlayerState<'a>>,
    ) -> Self {
        let rot = |i: usize| (seat as usize + i) % 4;
        PlayerState {
            seat,
            hand: &state.hands[seat as usize],
            red_fives: &state.red_fives[seat as usize],
            discards: std::array::from_fn(|i| state.discards[rot(i)].as_slice()),
            melds: std::array::from_fn(|i| state.melds[rot(i)].as_slice()),
            dora_indicators: &state.dora_indicators,
            riichi: std::array::from_fn(|i| state.riichi[rot(i)]),
            rank: state.rank(seat),
            round: state.round,
            round_wind: state.round_wind(),
            own_wind: state.seat_wind(seat),
            prev,
        }
    }
}
