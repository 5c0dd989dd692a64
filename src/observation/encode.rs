//! Fixed 43-plane boolean encoding of a [`PlayerState`].
//!
//! The plane layout and fill semantics are a bit-exact contract with the
//! downstream decision models; do not reorder.
//!
//! | planes | content                         | fill        |
//! |--------|---------------------------------|-------------|
//! | 0      | own hand                        | count-unary |
//! | 1      | own red fives                   | full row    |
//! | 2-5    | discard piles, rotated          | count-unary |
//! | 6-9    | meld piles, rotated             | count-unary |
//! | 10     | dora indicators                 | count-unary |
//! | 11-14  | riichi flags, rotated           | whole plane |
//! | 15-18  | rank one-hot                    | whole plane |
//! | 19-26  | round index one-hot (capped)    | whole plane |
//! | 27     | prevailing wind tile            | full row    |
//! | 28     | own wind tile                   | full row    |
//! | 29-42  | prior-snapshot hand/discards/melds/dora/riichi, zero if none |

use super::helpers::{PLANE_CELLS, fill_rows, fill_tiles, fill_value};
use super::{NUM_PLANES, PlayerState};
use crate::tile::WIND_KINDS;

impl PlayerState<'_> {
    /// Flat plane stack, plane-major: `buf[(plane * 34 + kind) * 4 + copy]`.
    pub fn encode(&self) -> Vec<i8> {
        let mut buf = vec![0i8; NUM_PLANES * PLANE_CELLS];
        let mut plane = 0;

        fill_tiles(&mut buf, plane, self.hand.iter().copied());
        plane += 1;
        fill_rows(&mut buf, plane, self.red_fives.iter().copied());
        plane += 1;
        for i in 0..4 {
            fill_tiles(&mut buf, plane + i, self.discards[i].iter().copied());
        }
        plane += 4;
        for i in 0..4 {
            fill_tiles(&mut buf, plane + i, meld_kinds(self.melds[i]));
        }
        plane += 4;
        fill_tiles(&mut buf, plane, self.dora_indicators.iter().copied());
        plane += 1;
        for i in 0..4 {
            fill_value(&mut buf, plane + i, self.riichi[i] as i8);
        }
        plane += 4;
        fill_value(&mut buf, plane + self.rank as usize, 1);
        plane += 4;
        fill_value(&mut buf, plane + self.round.min(7) as usize, 1);
        plane += 8;
        fill_rows(&mut buf, plane, [WIND_KINDS[self.round_wind as usize]]);
        plane += 1;
        fill_rows(&mut buf, plane, [WIND_KINDS[self.own_wind as usize]]);
        plane += 1;

        if let Some(prev) = self.prev {
            fill_tiles(&mut buf, plane, prev.hand.iter().copied());
            plane += 1;
            for i in 0..4 {
                fill_tiles(&mut buf, plane + i, prev.discards[i].iter().copied());
            }
            plane += 4;
            for i in 0..4 {
                fill_tiles(&mut buf, plane + i, meld_kinds(prev.melds[i]));
            }
            plane += 4;
            fill_tiles(&mut buf, plane, prev.dora_indicators.iter().copied());
            plane += 1;
            for i in 0..4 {
                fill_value(&mut buf, plane + i, prev.riichi[i] as i8);
            }
        }

        buf
    }
}

fn meld_kinds<'a>(melds: &'a [crate::state::Meld]) -> impl Iterator<Item = u8> + 'a {
    melds.iter().flat_map(|m| m.tiles.iter().copied())
}
