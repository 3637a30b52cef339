//! Per-tick growth of a chorus bud.

use glam::IVec3;

use tracing::trace;

use crate::segment::{Segment, MAX_MATURITY};
use crate::util::GrowthRand;
use crate::grid::{Grid, Feedback};

use super::{can_support, can_branch, is_isolated};


/// Maximum number of stems walked down below a bud when checking if the stem it stands
/// on is rooted in substrate.
const ROOT_SEARCH_DEPTH: i32 = 4;


/// Advance the bud at the given position by one growth step.
///
/// The bud is destroyed if it is no longer supported. Otherwise, if there is room above
/// it, the bud either moves up (leaving a stem behind), spreads into lateral buds one
/// maturity higher, or matures in place. Fully grown buds never change.
pub fn advance(grid: &mut impl Grid, pos: IVec3, rand: &mut impl GrowthRand) {

    if !can_support(grid, pos) {
        trace!("bud at {pos} lost its support");
        grid.destroy_cell(pos);
        return;
    }

    let above_pos = pos + IVec3::Y;
    if !grid.is_empty(above_pos + IVec3::Y) || above_pos.y >= grid.ceiling_height() {
        return;
    }

    let maturity = match grid.get_cell(pos) {
        Segment::Bud { maturity } if maturity < MAX_MATURITY => maturity,
        _ => return,
    };

    // NOTE: The Notchian growth gate is `nextInt(1) == 0`, always true, but we keep
    // drawing it so that random sequences stay the same.
    if rand.next_int_bounded(1) != 0 {
        return;
    }

    let (can_extend, rooted) = check_root(grid, pos, rand);

    if can_extend && grid.is_empty(above_pos) && is_isolated(grid, above_pos, None) {
        grid.set_cell(pos, Segment::Stem);
        place_bud(grid, above_pos, maturity);
    } else if maturity < MAX_MATURITY - 1 {

        let mut count = rand.next_int_bounded(4);
        if rooted {
            count += 1;
        }

        let mut branched = false;
        for _ in 0..count {
            let face = rand.next_horizontal();
            if can_branch(grid, pos, face) {
                place_bud(grid, pos + face.delta(), maturity + 1);
                branched = true;
            }
        }

        if branched {
            grid.set_cell(pos, Segment::Stem);
        } else {
            mature_bud(grid, pos);
        }

    } else {
        mature_bud(grid, pos);
    }

}

/// Look at what the bud stands on and return whether it may extend upward, and if the
/// stem below it is rooted in substrate. Long stems are less likely to extend, the
/// chance is slightly better when rooted.
fn check_root(grid: &impl Grid, pos: IVec3, rand: &mut impl GrowthRand) -> (bool, bool) {
    match grid.get_cell(pos - IVec3::Y) {
        Segment::Substrate |
        Segment::Empty => (true, false),
        Segment::Stem => {

            let mut rooted = false;
            let mut length = 1;

            for _ in 0..ROOT_SEARCH_DEPTH {
                match grid.get_cell(pos - IVec3::new(0, length + 1, 0)) {
                    Segment::Stem => length += 1,
                    Segment::Substrate => {
                        rooted = true;
                        break;
                    }
                    _ => break,
                }
            }

            let bound = if rooted { 5 } else { 4 };
            let can_extend = length < 2 || rand.next_int_bounded(bound) >= length;
            (can_extend, rooted)

        }
        _ => (false, false),
    }
}

#[inline]
fn place_bud(grid: &mut impl Grid, pos: IVec3, maturity: u8) {
    trace!("bud grown at {pos} with maturity {maturity}");
    grid.set_cell(pos, Segment::bud(maturity));
    grid.trigger_feedback(pos, Feedback::Grow);
}

#[inline]
fn mature_bud(grid: &mut impl Grid, pos: IVec3) {
    trace!("bud matured at {pos}");
    grid.set_cell(pos, Segment::mature_bud());
    grid.trigger_feedback(pos, Feedback::Mature);
}
