//! Collision resolution by discrete pairwise relaxation
//!
//! Each pass visits every pair of buildings. A pair that overlaps on both axes
//! (after adding the minimum gap) is pushed apart along the axis with the
//! smaller overlap, each building moving half the overlap plus a small
//! overshoot so the pair ends up strictly clear of the gap. Buildings are kept
//! inside the canvas after every pass. The loop stops after a pass that moves
//! nothing or when the pass budget runs out.

use crate::seed::SeededRng;

use super::config::LayoutConfig;
use super::types::Canvas;

/// Overlap below this is treated as resolved
const EPSILON: f64 = 1e-9;
/// Overlap tolerated when counting remaining violations
const OVERLAP_TOLERANCE: f64 = 1e-6;
/// Extra separation added to every push
const PUSH_OVERSHOOT: f64 = 0.5;

/// A building's center and size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Footprint {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// How far the pair must still move apart on each axis to keep `gap`
    /// clearance; positive on both axes means the pair collides.
    fn overlap(&self, other: &Footprint, gap: f64) -> (f64, f64) {
        let need_x = (self.width + other.width) / 2.0 + gap;
        let need_y = (self.height + other.height) / 2.0 + gap;
        (
            need_x - (other.x - self.x).abs(),
            need_y - (other.y - self.y).abs(),
        )
    }
}

/// Outcome of a resolver run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionReport {
    pub passes: usize,
    /// A pass completed without moving anything
    pub converged: bool,
    /// Pairs still closer than the gap after the final clamp
    pub remaining_overlaps: usize,
}

/// Separate overlapping footprints, then clamp them into the canvas.
///
/// `rng` only breaks ties when two centers coincide on the push axis.
pub fn resolve_collisions(
    items: &mut [Footprint],
    canvas: Canvas,
    config: &LayoutConfig,
    rng: &mut SeededRng,
) -> CollisionReport {
    let gap = config.min_gap.max(0.0);
    let mut passes = 0;
    let mut converged = false;

    for _ in 0..config.collision_iterations {
        passes += 1;
        let separated = separation_pass(items, gap, rng);
        let clamped = clamp_to_canvas(items, canvas, config.margin);
        if !separated && !clamped {
            converged = true;
            break;
        }
    }
    clamp_to_canvas(items, canvas, config.margin);

    let remaining_overlaps = count_overlaps(items, gap);
    if remaining_overlaps > 0 {
        tracing::warn!(
            passes,
            remaining_overlaps,
            "collision budget exhausted with overlapping buildings"
        );
    } else {
        tracing::debug!(passes, converged, "collisions resolved");
    }

    CollisionReport {
        passes,
        converged,
        remaining_overlaps,
    }
}

fn separation_pass(items: &mut [Footprint], gap: f64, rng: &mut SeededRng) -> bool {
    let mut moved = false;
    for i in 0..items.len() {
        for j in (i + 1)..items.len() {
            let (head, tail) = items.split_at_mut(j);
            let a = &mut head[i];
            let b = &mut tail[0];

            let (over_x, over_y) = a.overlap(b, gap);
            if over_x <= EPSILON || over_y <= EPSILON {
                continue;
            }

            if over_x <= over_y {
                let dir = direction(b.x - a.x, rng);
                let push = (over_x + PUSH_OVERSHOOT) / 2.0;
                a.x -= dir * push;
                b.x += dir * push;
            } else {
                let dir = direction(b.y - a.y, rng);
                let push = (over_y + PUSH_OVERSHOOT) / 2.0;
                a.y -= dir * push;
                b.y += dir * push;
            }
            tracing::trace!(i, j, over_x, over_y, "separated pair");
            moved = true;
        }
    }
    moved
}

fn direction(delta: f64, rng: &mut SeededRng) -> f64 {
    if delta > 0.0 {
        1.0
    } else if delta < 0.0 {
        -1.0
    } else {
        rng.sign()
    }
}

/// Keep every footprint inside the canvas margin; returns whether anything moved
pub fn clamp_to_canvas(items: &mut [Footprint], canvas: Canvas, margin: f64) -> bool {
    let area = canvas.interior(margin);
    let mut moved = false;
    for item in items.iter_mut() {
        let x = clamp_axis(item.x, area.min_x, area.max_x, item.width);
        let y = clamp_axis(item.y, area.min_y, area.max_y, item.height);
        if x != item.x || y != item.y {
            moved = true;
            item.x = x;
            item.y = y;
        }
    }
    moved
}

/// Clamp a center so the extent fits in `[low, high]`; centers the item when
/// it cannot fit at all.
fn clamp_axis(center: f64, low: f64, high: f64, extent: f64) -> f64 {
    let lo = low + extent / 2.0;
    let hi = high - extent / 2.0;
    if lo > hi {
        (low + high) / 2.0
    } else if center.is_nan() {
        lo
    } else {
        center.clamp(lo, hi)
    }
}

/// Number of pairs closer than `gap` on both axes
pub fn count_overlaps(items: &[Footprint], gap: f64) -> usize {
    let mut count = 0;
    for (i, a) in items.iter().enumerate() {
        for b in &items[i + 1..] {
            let (over_x, over_y) = a.overlap(b, gap);
            if over_x > OVERLAP_TOLERANCE && over_y > OVERLAP_TOLERANCE {
                count += 1;
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Canvas {
        Canvas::new(1000.0, 800.0)
    }

    fn resolve(items: &mut [Footprint]) -> CollisionReport {
        let mut rng = SeededRng::from_key("collision-test");
        resolve_collisions(items, canvas(), &LayoutConfig::default(), &mut rng)
    }

    #[test]
    fn test_separated_items_do_not_move() {
        let mut items = vec![
            Footprint::new(200.0, 200.0, 100.0, 60.0),
            Footprint::new(500.0, 200.0, 100.0, 60.0),
        ];
        let before = items.clone();
        let report = resolve(&mut items);
        assert_eq!(items, before);
        assert_eq!(report.passes, 1);
        assert!(report.converged);
        assert_eq!(report.remaining_overlaps, 0);
    }

    #[test]
    fn test_coincident_pair_split_along_smaller_overlap() {
        let mut items = vec![
            Footprint::new(500.0, 400.0, 100.0, 60.0),
            Footprint::new(500.0, 400.0, 100.0, 60.0),
        ];
        let report = resolve(&mut items);
        // x overlap needs 120, y overlap needs 80: split vertically, symmetric
        assert_eq!(items[0].x, 500.0);
        assert_eq!(items[1].x, 500.0);
        assert!(((items[0].y - items[1].y).abs() - 80.0 - PUSH_OVERSHOOT).abs() < 1e-9);
        assert!(((items[0].y + items[1].y) / 2.0 - 400.0).abs() < 1e-9);
        assert!(report.converged);
        assert_eq!(report.remaining_overlaps, 0);
    }

    #[test]
    fn test_push_keeps_relative_order() {
        let mut items = vec![
            Footprint::new(400.0, 400.0, 100.0, 60.0),
            Footprint::new(450.0, 400.0, 100.0, 60.0),
        ];
        resolve(&mut items);
        // x overlap 70 < y overlap 80: pushed horizontally, 35 each plus overshoot
        let push = 35.0 + PUSH_OVERSHOOT / 2.0;
        assert!((items[0].x - (400.0 - push)).abs() < 1e-9);
        assert!((items[1].x - (450.0 + push)).abs() < 1e-9);
        assert!(items[1].x - items[0].x > 100.0 + 20.0);
        assert_eq!(items[0].y, 400.0);
    }

    #[test]
    fn test_row_of_three_resolves() {
        let mut items = vec![
            Footprint::new(400.0, 400.0, 100.0, 60.0),
            Footprint::new(450.0, 400.0, 100.0, 60.0),
            Footprint::new(500.0, 400.0, 100.0, 60.0),
        ];
        let report = resolve(&mut items);
        assert!(report.converged);
        assert_eq!(count_overlaps(&items, 20.0), 0);
    }

    #[test]
    fn test_clamped_into_canvas() {
        let mut items = vec![
            Footprint::new(-50.0, 900.0, 100.0, 60.0),
            Footprint::new(2000.0, f64::NAN, 100.0, 60.0),
        ];
        resolve(&mut items);
        assert_eq!(items[0].x, 40.0 + 50.0);
        assert_eq!(items[0].y, 800.0 - 40.0 - 30.0);
        assert_eq!(items[1].x, 1000.0 - 40.0 - 50.0);
        assert_eq!(items[1].y, 40.0 + 30.0);
    }

    #[test]
    fn test_item_larger_than_canvas_is_centered() {
        let mut items = vec![Footprint::new(10.0, 10.0, 5000.0, 60.0)];
        resolve(&mut items);
        assert_eq!(items[0].x, 500.0);
    }

    #[test]
    fn test_budget_exhaustion_is_reported() {
        // two buildings that cannot both fit on a tiny canvas
        let mut items = vec![
            Footprint::new(50.0, 50.0, 80.0, 80.0),
            Footprint::new(60.0, 50.0, 80.0, 80.0),
        ];
        let mut rng = SeededRng::new(1);
        let config = LayoutConfig::default().with_collision_iterations(10);
        let report = resolve_collisions(&mut items, Canvas::new(100.0, 100.0), &config, &mut rng);
        assert_eq!(report.passes, 10);
        assert!(!report.converged);
        assert_eq!(report.remaining_overlaps, 1);
    }

    #[test]
    fn test_same_seed_same_result() {
        let start = vec![
            Footprint::new(500.0, 400.0, 100.0, 60.0),
            Footprint::new(500.0, 400.0, 100.0, 60.0),
            Footprint::new(500.0, 400.0, 80.0, 80.0),
        ];
        let mut first = start.clone();
        let mut second = start;
        resolve(&mut first);
        resolve(&mut second);
        assert_eq!(first, second);
    }
}
