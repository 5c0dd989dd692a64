use crate::errors::{ReplayError, ReplayResult};
use crate::event::{Event, KanType};
use crate::state::{GameState, LastAction, Meld};
use crate::tile::{is_red_five, kind_of};

impl GameState {
    /// Round start. Hands arrive as physical instances and are stored as
    /// ascending kinds; red fives are noted for feature encoding.
    pub fn init(
        hands: &[Vec<u8>; 4],
        dora_indicator: u8,
        scores: [i32; 4],
        round: u8,
        dealer: u8,
    ) -> GameState {
        let mut kind_hands: [Vec<u8>; 4] = Default::default();
        let mut red_fives: [Vec<u8>; 4] = Default::default();
        for seat in 0..4 {
            let mut hand: Vec<u8> = hands[seat].iter().map(|&i| kind_of(i)).collect();
            hand.sort_unstable();
            kind_hands[seat] = hand;
            red_fives[seat] = hands[seat]
                .iter()
                .filter(|&&i| is_red_five(i))
                .map(|&i| kind_of(i))
                .collect();
        }
        GameState {
            hands: kind_hands,
            red_fives,
            discards: Default::default(),
            melds: Default::default(),
            dora_indicators: vec![kind_of(dora_indicator)],
            riichi: [false; 4],
            scores,
            round,
            dealer,
            last_discard: None,
            last_action: LastAction::None,
            finished: false,
            gains: None,
        }
    }

    /// Derive the successor snapshot for one event. The predecessor is
    /// never touched; `Err` means the log is corrupt and the round's replay
    /// must stop.
    pub fn apply(&self, event: &Event) -> ReplayResult<GameState> {
        match event {
            Event::Init {
                hands,
                dora_indicator,
                scores,
                round,
                dealer,
            } => Ok(Self::init(hands, *dora_indicator, *scores, *round, *dealer)),
            Event::Draw { seat, tile } => Ok(self.with_draw(*seat, *tile)),
            Event::Discard { seat, tile } => self.with_discard(*seat, *tile),
            Event::Call {
                caller,
                source,
                tiles,
                ..
            } => self.with_call(*caller, *source, tiles),
            Event::Kan {
                seat,
                subtype,
                tiles,
            } => self.with_kan(*seat, tiles, *subtype),
            Event::Riichi { seat, step } => self.with_riichi(*seat, *step),
            Event::DoraReveal { tile } => Ok(self.with_dora(*tile)),
            Event::Finish { scores, gains } => Ok(self.with_finish(*scores, *gains)),
        }
    }

    fn with_draw(&self, seat: u8, tile: u8) -> GameState {
        let mut next = self.clone();
        let s = seat as usize;
        next.hands[s].push(kind_of(tile));
        if is_red_five(tile) {
            next.red_fives[s].push(kind_of(tile));
        }
        next.last_action = LastAction::None;
        next
    }

    fn with_discard(&self, seat: u8, tile: u8) -> ReplayResult<GameState> {
        let mut next = self.clone();
        let s = seat as usize;
        let kind = kind_of(tile);
        let pos = next.hands[s].iter().position(|&t| t == kind).ok_or_else(|| {
            ReplayError::MalformedEvent {
                message: format!("seat {} discarded kind {} not in hand", seat, kind),
            }
        })?;
        next.hands[s].remove(pos);
        next.hands[s].sort_unstable();
        next.discards[s].push(kind);
        if is_red_five(tile) {
            next.red_fives[s].retain(|&k| k != kind);
        }
        next.last_discard = Some((seat, kind));
        next.last_action = LastAction::Discard { seat, tile: kind };
        Ok(next)
    }

    fn with_riichi(&self, seat: u8, step: u8) -> ReplayResult<GameState> {
        match step {
            1 => {
                let mut next = self.clone();
                next.riichi[seat as usize] = true;
                next.last_action = LastAction::Riichi { seat };
                Ok(next)
            }
            // The deposit step is scoring-only and deliberately inert.
            2 => Ok(self.clone()),
            _ => Err(ReplayError::MalformedEvent {
                message: format!("riichi step {} for seat {}", step, seat),
            }),
        }
    }

    /// Claim of the most recent discard. The claimed tile moves from the
    /// source's discard pile into the meld group; the remaining tiles of
    /// the group leave the caller's hand.
    fn with_call(&self, caller: u8, source: u8, tiles: &[u8]) -> ReplayResult<GameState> {
        let Some((_, claimed)) = self.last_discard else {
            return Err(ReplayError::MalformedEvent {
                message: format!("seat {} called with no discard on the table", caller),
            });
        };
        let kinds: Vec<u8> = tiles.iter().map(|&i| kind_of(i)).collect();
        if !kinds.contains(&claimed) {
            return Err(ReplayError::MalformedEvent {
                message: format!(
                    "seat {} called {:?} which excludes the discarded kind {}",
                    caller, kinds, claimed
                ),
            });
        }

        let mut next = self.clone();
        let c = caller as usize;

        if next.discards[source as usize].last() != Some(&claimed) {
            return Err(ReplayError::MalformedEvent {
                message: format!(
                    "seat {} claimed kind {} but seat {}'s pile does not end with it",
                    caller, claimed, source
                ),
            });
        }
        next.discards[source as usize].pop();

        let mut skipped_claimed = false;
        for (i, &kind) in kinds.iter().enumerate() {
            if !skipped_claimed && kind == claimed {
                skipped_claimed = true;
                continue;
            }
            let pos = next.hands[c].iter().position(|&t| t == kind).ok_or_else(|| {
                ReplayError::MalformedEvent {
                    message: format!("seat {} called kind {} not in hand", caller, kind),
                }
            })?;
            next.hands[c].remove(pos);
            if is_red_five(tiles[i]) {
                next.red_fives[c].retain(|&k| k != kind);
            }
        }

        next.melds[c].push(Meld {
            tiles: kinds.clone(),
        });
        next.last_action = LastAction::Call {
            seat: caller,
            tiles: kinds,
        };
        Ok(next)
    }

    /// Quad declaration of any provenance: accumulate the kind's meld
    /// copies up to four (extending an open triplet when one exists) and
    /// strip every copy from the hand. A claimed quad also consumes the
    /// discard it was called on.
    fn with_kan(&self, seat: u8, tiles: &[u8], subtype: KanType) -> ReplayResult<GameState> {
        let Some(&first) = tiles.first() else {
            return Err(ReplayError::MalformedEvent {
                message: format!("seat {} declared a quad with no tiles", seat),
            });
        };
        let mut next = self.clone();
        let s = seat as usize;
        let kind = kind_of(first);

        if subtype == KanType::Claimed
            && let Some((src, k)) = next.last_discard
            && k == kind
            && next.discards[src as usize].last() == Some(&kind)
        {
            next.discards[src as usize].pop();
        }

        let have = next.total_meld_copies(s, kind);
        let need = 4usize.saturating_sub(have);
        if need > 0 {
            match next.melds[s]
                .iter_mut()
                .find(|m| m.tiles.iter().all(|&t| t == kind) && !m.tiles.is_empty())
            {
                Some(group) => group.tiles.extend(std::iter::repeat_n(kind, need)),
                None => next.melds[s].push(Meld {
                    tiles: vec![kind; need],
                }),
            }
        }

        next.hands[s].retain(|&t| t != kind);
        next.red_fives[s].retain(|&k| k != kind);
        next.last_action = LastAction::None;
        Ok(next)
    }

    fn with_dora(&self, tile: u8) -> GameState {
        let mut next = self.clone();
        next.dora_indicators.push(kind_of(tile));
        next.last_action = LastAction::None;
        next
    }

    fn with_finish(&self, scores: [i32; 4], gains: [i32; 4]) -> GameState {
        let mut next = self.clone();
        next.scores = scores;
        next.gains = Some(gains);
        next.finished = true;
        next.last_action = LastAction::None;
        next
    }
}
