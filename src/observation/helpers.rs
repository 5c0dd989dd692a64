use super::{PLANE_COPIES, PLANE_KINDS};

pub(crate) const PLANE_CELLS: usize = PLANE_KINDS * PLANE_COPIES;

/// Buffer layout: plane-major, buf[(plane * 34 + kind) * 4 + copy].
#[inline]
fn cell(plane: usize, kind: usize, copy: usize) -> usize {
    (plane * PLANE_KINDS + kind) * PLANE_COPIES + copy
}

/// Unary count fill: each occurrence of a kind lights the next free copy
/// slot in its row.
pub(crate) fn fill_tiles<I>(buf: &mut [i8], plane: usize, tiles: I)
where
    I: IntoIterator<Item = u8>,
{
    for kind in tiles {
        let kind = kind as usize;
        if kind >= PLANE_KINDS {
            continue;
        }
        for copy in 0..PLANE_COPIES {
            if buf[cell(plane, kind, copy)] == 0 {
                buf[cell(plane, kind, copy)] = 1;
                break;
            }
        }
    }
}

/// Set every copy slot of each given kind.
pub(crate) fn fill_rows<I>(buf: &mut [i8], plane: usize, kinds: I)
where
    I: IntoIterator<Item = u8>,
{
    for kind in kinds {
        let kind = kind as usize;
        if kind >= PLANE_KINDS {
            continue;
        }
        for copy in 0..PLANE_COPIES {
            buf[cell(plane, kind, copy)] = 1;
        }
    }
}

/// Fill a whole plane with one value.
pub(crate) fn fill_value(buf: &mut [i8], plane: usize, value: i8) {
    let start = plane * PLANE_CELLS;
    buf[start..start + PLANE_CELLS].fill(value);
}
