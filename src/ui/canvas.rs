use rayon::prelude::*;

use crate::simulation::driver::{ArmPose, ArmView};
use crate::simulation::kinematics::hand_position;
use crate::simulation::params::{CANVAS_EXTENT, HAND_RADIUS, SEGMENT_THICKNESS};

/// Glyphs of one arm: `(segment, hand)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArmGlyphs {
    pub segment: char,
    pub hand: char,
}

pub const REAL: ArmGlyphs = ArmGlyphs { segment: '#', hand: '@' };
pub const TARGET: ArmGlyphs = ArmGlyphs { segment: '*', hand: 'X' };
pub const GENERATED: ArmGlyphs = ArmGlyphs { segment: '+', hand: 'g' };
pub const SENSED: ArmGlyphs = ArmGlyphs { segment: '.', hand: 's' };
pub const BASE: char = 'O';
pub const EMPTY: char = ' ';

/// Every glyph the canvas can contain.
pub const PALETTE: &str = " #@*X+g.sO";

/// Distance from `p` to the segment from the origin to `end`.
fn distance_to_link(p: [f64; 2], end: [f64; 2]) -> f64 {
    let len_sq = end[0] * end[0] + end[1] * end[1];
    let t = if len_sq > 0.0 {
        ((p[0] * end[0] + p[1] * end[1]) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let dx = p[0] - t * end[0];
    let dy = p[1] - t * end[1];
    dx.hypot(dy)
}

fn glyph_at(p: [f64; 2], layers: &[(ArmPose, ArmGlyphs)], arm_length: f64) -> char {
    if p[0].hypot(p[1]) < HAND_RADIUS {
        return BASE;
    }
    for (pose, glyphs) in layers {
        let hand = pose.hand;
        if (p[0] - hand[0]).hypot(p[1] - hand[1]) < HAND_RADIUS {
            return glyphs.hand;
        }
        if distance_to_link(p, hand_position(pose.angle, arm_length)) < SEGMENT_THICKNESS {
            return glyphs.segment;
        }
    }
    EMPTY
}

/// Rasterises the four arms of `view` into `rows` lines of `cols` characters.
///
/// The square `[-CANVAS_EXTENT, CANVAS_EXTENT]²` fills the grid, row 0 on top.
/// Overlaps resolve as real > target > generated > sensed.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn compute_arm_grid(view: &ArmView, arm_length: f64, rows: usize, cols: usize) -> Vec<String> {
    if rows == 0 || cols == 0 {
        return Vec::new();
    }

    let layers = [
        (view.real, REAL),
        (view.target, TARGET),
        (view.generated, GENERATED),
        (view.sensed, SENSED),
    ];
    let scale_y = 2.0 * CANVAS_EXTENT / rows as f64;
    let scale_x = 2.0 * CANVAS_EXTENT / cols as f64;

    (0..rows)
        .into_par_iter()
        .map(|r| {
            let world_y = CANVAS_EXTENT - (r as f64 + 0.5) * scale_y;
            (0..cols)
                .map(|c| {
                    let world_x = -CANVAS_EXTENT + (c as f64 + 0.5) * scale_x;
                    glyph_at([world_x, world_y], &layers, arm_length)
                })
                .collect()
        })
        .collect()
}
