//! Initial grid placement
//!
//! Units are split into four groups using the row hints of their zone
//! template:
//!
//! - **main flow** (row 1): one horizontal line, ordered by column
//! - **feeders** (row 2+): lines below the main flow; a feeder sits under the
//!   main-flow unit with the same column, otherwise feeders are spread evenly
//! - **perimeter** (row 0): fixed corner slots
//! - **unclassified**: an auto-grid whose cells fit the largest unclassified
//!   building plus the minimum gap
//!
//! Classified positions are fixed fractions of the canvas interior. When only
//! unclassified units are present the grid spreads over the whole interior;
//! otherwise they take the grid cells left free by the classified buildings,
//! filling from the bottom up. Nothing here is randomized; given the same
//! ordered input the output is always the same.

use std::cmp::Ordering;

use crate::knowledge::ZoneTemplate;

use super::config::LayoutConfig;
use super::dimensions::BuildingSize;
use super::types::{BoundingBox, Canvas, Point};

/// Vertical position of the main production row
const MAIN_ROW_Y: f64 = 0.35;
/// Vertical position of the first feeder row, and the step per further row
const FEEDER_ROW_Y: f64 = 0.62;
const FEEDER_ROW_STEP: f64 = 0.2;
const FEEDER_ROW_MAX_Y: f64 = 0.9;
/// Upper-left, lower-right, upper-right, lower-left
const PERIMETER_SLOTS: [(f64, f64); 4] = [(0.08, 0.08), (0.92, 0.92), (0.92, 0.08), (0.08, 0.92)];
/// How far each further lap of perimeter slots moves toward the center
const PERIMETER_INSET_STEP: f64 = 0.06;

/// Placement group of a unit, in flow order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PlacementGroup {
    MainFlow,
    Feeder,
    Perimeter,
    Unclassified,
}

impl PlacementGroup {
    pub fn of(zone: Option<&ZoneTemplate>) -> Self {
        match zone.map(|z| z.row) {
            Some(0) => PlacementGroup::Perimeter,
            Some(1) => PlacementGroup::MainFlow,
            Some(_) => PlacementGroup::Feeder,
            None => PlacementGroup::Unclassified,
        }
    }
}

/// A unit waiting to be placed
#[derive(Debug, Clone, Copy)]
pub struct PlacementItem<'a> {
    pub name: &'a str,
    pub zone: Option<&'a ZoneTemplate>,
}

impl<'a> PlacementItem<'a> {
    pub fn new(name: &'a str, zone: Option<&'a ZoneTemplate>) -> Self {
        Self { name, zone }
    }

    pub fn group(&self) -> PlacementGroup {
        PlacementGroup::of(self.zone)
    }
}

/// Flow order: group, then row and column hints, ties broken by name
pub fn flow_order(a: &PlacementItem<'_>, b: &PlacementItem<'_>) -> Ordering {
    let key = |item: &PlacementItem<'_>| {
        (
            item.group(),
            item.zone.map_or(0, |z| z.row),
            item.zone.map_or(0, |z| z.col),
        )
    };
    key(a).cmp(&key(b)).then_with(|| a.name.cmp(b.name))
}

/// Compute initial centers; the result is index-aligned with `items` and
/// `sizes`.
///
/// `items` should already be in [`flow_order`], which fixes the order inside
/// each group.
pub fn initial_positions(
    items: &[PlacementItem<'_>],
    sizes: &[BuildingSize],
    canvas: Canvas,
    config: &LayoutConfig,
) -> Vec<Point> {
    let area = canvas.interior(config.margin);
    let at = |fx: f64, fy: f64| {
        Point::new(
            area.min_x + area.width() * fx,
            area.min_y + area.height() * fy,
        )
    };

    let mut positions = vec![Point::new(0.0, 0.0); items.len()];
    let indices_of = |group: PlacementGroup| -> Vec<usize> {
        (0..items.len())
            .filter(|&i| items[i].group() == group)
            .collect()
    };

    let main = indices_of(PlacementGroup::MainFlow);
    for (slot, &i) in main.iter().enumerate() {
        positions[i] = at(even_fraction(slot, main.len()), MAIN_ROW_Y);
    }

    let feeders = indices_of(PlacementGroup::Feeder);
    for (slot, &i) in feeders.iter().enumerate() {
        let zone = items[i].zone;
        let row = zone.map_or(2, |z| z.row);
        let fy = (FEEDER_ROW_Y + FEEDER_ROW_STEP * (row.saturating_sub(2)) as f64)
            .min(FEEDER_ROW_MAX_Y);
        let partner = main
            .iter()
            .find(|&&m| items[m].zone.map(|z| z.col) == zone.map(|z| z.col));
        positions[i] = match partner {
            Some(&m) => Point::new(positions[m].x, at(0.0, fy).y),
            None => at(even_fraction(slot, feeders.len()), fy),
        };
    }

    let perimeter = indices_of(PlacementGroup::Perimeter);
    for (slot, &i) in perimeter.iter().enumerate() {
        let (fx, fy) = PERIMETER_SLOTS[slot % PERIMETER_SLOTS.len()];
        let lap = (slot / PERIMETER_SLOTS.len()) as f64 * PERIMETER_INSET_STEP;
        positions[i] = at(toward_center(fx, lap), toward_center(fy, lap));
    }

    let unclassified = indices_of(PlacementGroup::Unclassified);
    let gap = config.min_gap.max(0.0);
    let cell = unclassified.iter().fold(
        BuildingSize {
            width: 0.0,
            height: 0.0,
        },
        |cell, &i| BuildingSize {
            width: cell.width.max(sizes[i].width),
            height: cell.height.max(sizes[i].height),
        },
    );
    let grid = if unclassified.len() == items.len() {
        auto_grid(unclassified.len(), config.auto_grid_columns, cell, gap, area)
    } else {
        let occupied: Vec<BoundingBox> = (0..items.len())
            .filter(|&i| items[i].group() != PlacementGroup::Unclassified)
            .map(|i| {
                let Point { x, y } = positions[i];
                BoundingBox::from_center(x, y, sizes[i].width, sizes[i].height)
            })
            .collect();
        free_cells(unclassified.len(), cell, &occupied, gap, area)
    };
    for (&i, point) in unclassified.iter().zip(grid) {
        positions[i] = point;
    }

    tracing::debug!(
        main = main.len(),
        feeders = feeders.len(),
        perimeter = perimeter.len(),
        unclassified = unclassified.len(),
        "initial placement"
    );

    positions
}

/// Fraction for slot `index` of `count` evenly spaced slots, excluding the ends
fn even_fraction(index: usize, count: usize) -> f64 {
    (index + 1) as f64 / (count + 1) as f64
}

fn toward_center(fraction: f64, amount: f64) -> f64 {
    if fraction < 0.5 {
        (fraction + amount).min(0.5)
    } else {
        (fraction - amount).max(0.5)
    }
}

/// Number of `pitch`-wide slots that fit in `span`, at least one
fn slots(span: f64, pitch: f64) -> usize {
    if pitch > 0.0 && span.is_finite() {
        ((span / pitch).floor() as usize).max(1)
    } else {
        1
    }
}

/// Cell centers of a row-major grid of `count` cells spread over `area`.
///
/// Wraps every `min_columns` columns, widening the grid to roughly square when
/// there are many cells. The column count then moves toward one where every
/// cell fits `cell` plus `gap` on both axes.
fn auto_grid(
    count: usize,
    min_columns: usize,
    cell: BuildingSize,
    gap: f64,
    area: BoundingBox,
) -> Vec<Point> {
    if count == 0 {
        return vec![];
    }
    let fit_columns = slots(area.width(), cell.width + gap);
    let fit_rows = slots(area.height(), cell.height + gap);
    let rows_for = |columns: usize| count.div_ceil(columns);

    let square = (count as f64).sqrt().ceil() as usize;
    let mut columns = min_columns.max(1).max(square).min(count);
    while columns < count && columns < fit_columns && rows_for(columns) > fit_rows {
        columns += 1;
    }
    while columns > fit_columns && columns > 1 && rows_for(columns - 1) <= fit_rows {
        columns -= 1;
    }
    let rows = rows_for(columns);

    (0..count)
        .map(|index| {
            let col = index % columns;
            let row = index / columns;
            Point::new(
                area.min_x + area.width() * (col as f64 + 0.5) / columns as f64,
                area.min_y + area.height() * (row as f64 + 0.5) / rows as f64,
            )
        })
        .collect()
}

/// Centers for `count` buildings no larger than `cell`, taken from a grid over
/// `area`.
///
/// Cells clear of every `occupied` box by `gap` are used first, scanning rows
/// from the bottom up; blocked cells follow once the free ones run out. The
/// chosen cells are returned in row-major order.
fn free_cells(
    count: usize,
    cell: BuildingSize,
    occupied: &[BoundingBox],
    gap: f64,
    area: BoundingBox,
) -> Vec<Point> {
    if count == 0 {
        return vec![];
    }
    let columns = slots(area.width(), cell.width + gap);
    let rows = slots(area.height(), cell.height + gap);

    let (mut free, mut blocked): (Vec<_>, Vec<_>) = (0..rows)
        .rev()
        .flat_map(|row| (0..columns).map(move |col| (row, col)))
        .map(|(row, col)| {
            let center = Point::new(
                area.min_x + area.width() * (col as f64 + 0.5) / columns as f64,
                area.min_y + area.height() * (row as f64 + 0.5) / rows as f64,
            );
            (row, col, center)
        })
        .partition(|&(_, _, center)| {
            let footprint =
                BoundingBox::from_center(center.x, center.y, cell.width, cell.height).expand(gap);
            !occupied.iter().any(|b| footprint.intersects(b))
        });
    free.append(&mut blocked);

    let mut chosen: Vec<(usize, usize, Point)> =
        free.iter().copied().cycle().take(count).collect();
    chosen.sort_by_key(|&(row, col, _)| (row, col));
    chosen.into_iter().map(|(_, _, center)| center).collect()
}
