//! Typed event records consumed by the state machine.
//!
//! These are the boundary with the log parser: one record per archived game
//! event, tiles given as physical instances in [0, 136). Serialization uses
//! an internal `type` tag so a JSONL event stream deserializes line by line.

use serde::{Deserialize, Serialize};

/// Which meld a discard claim forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallType {
    Triplet = 0,
    Run = 1,
    OpenQuad = 2,
}

/// Provenance of a quad declaration. All three produce the same state
/// effect; the distinction is carried through for downstream consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KanType {
    Concealed = 0,
    Claimed = 1,
    Upgraded = 2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Round start: four 13-tile deals, first dora indicator, carried
    /// scores, round index 0-7 and dealer seat.
    Init {
        hands: [Vec<u8>; 4],
        dora_indicator: u8,
        scores: [i32; 4],
        round: u8,
        dealer: u8,
    },
    Draw {
        seat: u8,
        tile: u8,
    },
    Discard {
        seat: u8,
        tile: u8,
    },
    /// Claim of the most recent discard: `tiles` is the full meld group
    /// including the discarded tile itself.
    Call {
        caller: u8,
        source: u8,
        call_type: CallType,
        tiles: Vec<u8>,
    },
    Kan {
        seat: u8,
        subtype: KanType,
        tiles: Vec<u8>,
    },
    /// Two-step riichi: step 1 is the declaration, step 2 the deposit
    /// (scoring-only, no state effect).
    Riichi {
        seat: u8,
        step: u8,
    },
    DoraReveal {
        tile: u8,
    },
    /// Round end (win or exhaustive draw): final scores and per-seat gains.
    Finish {
        scores: [i32; 4],
        gains: [i32; 4],
    },
}

impl Event {
    /// Short tag for error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Event::Init { .. } => "init",
            Event::Draw { .. } => "draw",
            Event::Discard { .. } => "discard",
            Event::Call { .. } => "call",
            Event::Kan { .. } => "kan",
            Event::Riichi { .. } => "riichi",
            Event::DoraReveal { .. } => "dora_reveal",
            Event::Finish { .. } => "finish",
        }
    }
}
