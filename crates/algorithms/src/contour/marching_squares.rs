//! Vector contour extraction via marching squares
//!
//! Squares are formed by four neighbouring cell centers. Each square whose
//! corners straddle the iso-value contributes one or two segments, with end
//! points linearly interpolated along the square's edges. Segments sharing
//! an edge crossing are joined into polylines: chains that reach the grid
//! border stay open, the rest close into rings.

use std::collections::BTreeMap;

use super::ContourSet;
use crate::imagery::BinaryGrid;
use terminus_core::raster::{GeoTransform, Raster, RasterElement};
use terminus_core::vector::{Contour, Point};
use terminus_core::{Algorithm, Error, Result};

/// Parameters for contour tracing
#[derive(Debug, Clone)]
pub struct ContourParams {
    /// Value the contour lines follow
    pub iso_value: f64,
}

impl Default for ContourParams {
    fn default() -> Self {
        // Halfway between water/land (0) and ice (1)
        Self { iso_value: 0.5 }
    }
}

/// Boundary tracer over a binary ice grid
#[derive(Debug, Clone, Default)]
pub struct ContourTracer;

impl Algorithm for ContourTracer {
    type Input = BinaryGrid;
    type Output = ContourSet;
    type Params = ContourParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Contour Tracing"
    }

    fn description(&self) -> &'static str {
        "Trace iso-value boundary polylines with marching squares"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        trace_contours(input.grid(), &params)
    }
}

/// A crossing point, identified by the grid edge it lies on.
///
/// `Horizontal(r, c)` joins centers (r, c) and (r, c + 1);
/// `Vertical(r, c)` joins centers (r, c) and (r + 1, c).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum EdgeKey {
    Horizontal(usize, usize),
    Vertical(usize, usize),
}

/// Sides of one square
#[derive(Debug, Clone, Copy)]
enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    fn key(self, row: usize, col: usize) -> EdgeKey {
        match self {
            Side::Top => EdgeKey::Horizontal(row, col),
            Side::Right => EdgeKey::Vertical(row, col + 1),
            Side::Bottom => EdgeKey::Horizontal(row + 1, col),
            Side::Left => EdgeKey::Vertical(row, col),
        }
    }
}

/// Side pairs cut by the contour for a square's corner configuration.
///
/// Case bits: top-left = 8, top-right = 4, bottom-right = 2, bottom-left = 1,
/// set when the corner lies above the iso-value. Saddles (5 and 10) depend on
/// whether the square's center reaches the iso-value; on a 0/1 grid at 0.5 it
/// always does, so diagonal ice cells join into one region.
fn square_segments(case: u8, center_above: bool) -> &'static [(Side, Side)] {
    use Side::*;
    match case {
        1 | 14 => &[(Left, Bottom)],
        2 | 13 => &[(Bottom, Right)],
        3 | 12 => &[(Left, Right)],
        4 | 11 => &[(Top, Right)],
        6 | 9 => &[(Top, Bottom)],
        7 | 8 => &[(Top, Left)],
        5 if center_above => &[(Top, Left), (Bottom, Right)],
        5 => &[(Top, Right), (Left, Bottom)],
        10 if center_above => &[(Top, Right), (Left, Bottom)],
        10 => &[(Top, Left), (Bottom, Right)],
        _ => &[],
    }
}

/// Trace all iso-value contours of a raster.
///
/// Contour vertices are planar coordinates obtained through the raster's
/// transform. For a 0/1 grid at the default iso-value of 0.5 every vertex
/// falls on a shared cell edge.
///
/// # Errors
/// `EmptyContourSet` if the raster has no cell pair straddling the
/// iso-value, e.g. a grid that is uniformly ice or uniformly water.
pub fn trace_contours<T: RasterElement>(grid: &Raster<T>, params: &ContourParams) -> Result<ContourSet> {
    let iso = params.iso_value;
    if !iso.is_finite() {
        return Err(Error::InvalidParameter {
            name: "iso_value",
            value: iso.to_string(),
            reason: "must be finite".into(),
        });
    }

    let (rows, cols) = grid.shape();
    let values = grid.data().mapv(|v| {
        if grid.is_nodata(v) {
            f64::NAN
        } else {
            v.to_f64().unwrap_or(f64::NAN)
        }
    });

    let mut adjacency: BTreeMap<EdgeKey, Vec<EdgeKey>> = BTreeMap::new();

    for row in 0..rows.saturating_sub(1) {
        for col in 0..cols.saturating_sub(1) {
            let corners = [
                values[(row, col)],
                values[(row, col + 1)],
                values[(row + 1, col + 1)],
                values[(row + 1, col)],
            ];
            // Squares touching no-data are skipped
            if corners.iter().any(|v| v.is_nan()) {
                continue;
            }

            let case = corners
                .iter()
                .fold(0u8, |acc, &v| (acc << 1) | u8::from(v > iso));
            let center_above = corners.iter().sum::<f64>() / 4.0 >= iso;

            for &(a, b) in square_segments(case, center_above) {
                let (ka, kb) = (a.key(row, col), b.key(row, col));
                adjacency.entry(ka).or_default().push(kb);
                adjacency.entry(kb).or_default().push(ka);
            }
        }
    }

    if adjacency.is_empty() {
        return Err(Error::EmptyContourSet);
    }

    let transform = grid.transform();
    let locate = |key: EdgeKey| crossing_point(key, &values, iso, transform);

    let mut contours = Vec::new();

    // Open chains start at their border ends; whatever remains is a ring
    let open_ends: Vec<EdgeKey> = adjacency
        .iter()
        .filter(|(_, next)| next.len() == 1)
        .map(|(&key, _)| key)
        .collect();
    for start in open_ends {
        if adjacency.get(&start).is_some_and(|next| !next.is_empty()) {
            let chain = walk(&mut adjacency, start);
            contours.push(Contour::new(chain.into_iter().map(locate).collect()));
        }
    }

    // `walk` drops exhausted crossings, so any key left starts a ring
    while let Some(&start) = adjacency.keys().next() {
        let chain = walk(&mut adjacency, start);
        contours.push(Contour::new(chain.into_iter().map(locate).collect()));
    }

    Ok(ContourSet::new(iso, contours))
}

/// Follow unvisited segments from `start`, consuming them, until the chain
/// ends or returns to `start`. Crossings with no segment left are removed.
fn walk(adjacency: &mut BTreeMap<EdgeKey, Vec<EdgeKey>>, start: EdgeKey) -> Vec<EdgeKey> {
    let mut chain = vec![start];
    let mut current = start;

    while let Some(next) = take_neighbour(adjacency, current, None) {
        take_neighbour(adjacency, next, Some(current));
        chain.push(next);
        current = next;
    }

    chain
}

/// Remove one segment end from `key`'s list: `other` if given, else the
/// last one. Drops `key` from the map once its list is empty.
fn take_neighbour(
    adjacency: &mut BTreeMap<EdgeKey, Vec<EdgeKey>>,
    key: EdgeKey,
    other: Option<EdgeKey>,
) -> Option<EdgeKey> {
    let neighbours = adjacency.get_mut(&key)?;
    let taken = match other {
        Some(other) => {
            let pos = neighbours.iter().position(|&k| k == other)?;
            Some(neighbours.swap_remove(pos))
        }
        None => neighbours.pop(),
    };
    if neighbours.is_empty() {
        adjacency.remove(&key);
    }
    taken
}

/// Interpolated planar position of the iso-value on a grid edge
fn crossing_point(
    key: EdgeKey,
    values: &ndarray::Array2<f64>,
    iso: f64,
    transform: &GeoTransform,
) -> Point {
    let fraction = |a: f64, b: f64| {
        if (b - a).abs() < f64::EPSILON {
            0.5
        } else {
            ((iso - a) / (b - a)).clamp(0.0, 1.0)
        }
    };

    let (col, row) = match key {
        EdgeKey::Horizontal(r, c) => {
            let t = fraction(values[(r, c)], values[(r, c + 1)]);
            (c as f64 + 0.5 + t, r as f64 + 0.5)
        }
        EdgeKey::Vertical(r, c) => {
            let t = fraction(values[(r, c)], values[(r + 1, c)]);
            (c as f64 + 0.5, r as f64 + 0.5 + t)
        }
    };

    Point::from(transform.fractional_to_geo(col, row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use terminus_core::GeoTransform;

    fn binary(rows: usize, cols: usize, ice: impl Fn(usize, usize) -> bool) -> Raster<u8> {
        let mut r = Raster::new(rows, cols);
        r.set_transform(GeoTransform::new(0.0, rows as f64, 1.0, -1.0));
        for row in 0..rows {
            for col in 0..cols {
                r.set(row, col, u8::from(ice(row, col))).unwrap();
            }
        }
        r
    }

    #[test]
    fn test_all_water_has_no_contour() {
        let grid = binary(10, 10, |_, _| false);
        let result = trace_contours(&grid, &ContourParams::default());
        assert!(matches!(result, Err(Error::EmptyContourSet)));
    }

    #[test]
    fn test_all_ice_has_no_contour() {
        let grid = binary(6, 6, |_, _| true);
        let result = trace_contours(&grid, &ContourParams::default());
        assert!(matches!(result, Err(Error::EmptyContourSet)));
    }

    #[test]
    fn test_straight_ice_front() {
        // Ice in rows 0-6 of a 10x10 grid; the front lies on the edge
        // between rows 6 and 7
        let grid = binary(10, 10, |row, _| row <= 6);
        let set = trace_contours(&grid, &ContourParams::default()).unwrap();
        assert_eq!(set.len(), 1);

        let front = &set.contours()[0];
        assert!(!front.is_closed());
        assert_eq!(front.len(), 10);
        assert_relative_eq!(front.length(), 9.0, epsilon = 1e-12);
        for p in front.points() {
            assert_relative_eq!(p.y, 3.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_island_forms_closed_ring() {
        // 2x2 ice block surrounded by water
        let grid = binary(6, 6, |row, col| (2..4).contains(&row) && (2..4).contains(&col));
        let set = trace_contours(&grid, &ContourParams::default()).unwrap();
        assert_eq!(set.len(), 1);

        let ring = &set.contours()[0];
        assert!(ring.is_closed());
        // Octagon through the eight ice/water edge midpoints
        assert_eq!(ring.len(), 9);
        assert!(ring.length() > 4.0 && ring.length() < 8.0);
    }

    #[test]
    fn test_separate_boundaries_are_separate_contours() {
        // Two ice bands separated by water
        let grid = binary(12, 8, |row, _| row < 3 || (6..9).contains(&row));
        let set = trace_contours(&grid, &ContourParams::default()).unwrap();
        assert_eq!(set.len(), 3);
        for c in set.iter() {
            assert_relative_eq!(c.length(), 7.0, epsilon = 1e-12);
        }
    }

    fn coords(set: &ContourSet) -> Vec<Vec<(f64, f64)>> {
        set.iter()
            .map(|c| c.points().iter().map(|p| (p.x, p.y)).collect())
            .collect()
    }

    #[test]
    fn test_saddle_cuts_off_water_corners() {
        // Ice on the main diagonal (case 10): water corners top-right and
        // bottom-left are each cut off by their own segment
        let grid = binary(2, 2, |row, col| row == col);
        let set = trace_contours(&grid, &ContourParams::default()).unwrap();
        assert_eq!(
            coords(&set),
            vec![vec![(1.0, 1.5), (1.5, 1.0)], vec![(1.0, 0.5), (0.5, 1.0)]]
        );

        let again = trace_contours(&grid, &ContourParams::default()).unwrap();
        assert_eq!(set, again);
    }

    #[test]
    fn test_anti_diagonal_saddle() {
        // Ice on the anti-diagonal (case 5): water corners top-left and
        // bottom-right are cut off
        let grid = binary(2, 2, |row, col| row != col);
        let set = trace_contours(&grid, &ContourParams::default()).unwrap();
        assert_eq!(
            coords(&set),
            vec![vec![(1.0, 1.5), (0.5, 1.0)], vec![(1.0, 0.5), (1.5, 1.0)]]
        );
    }

    #[test]
    fn test_diagonal_ice_cells_share_one_boundary() {
        let grid = binary(4, 4, |row, col| (row, col) == (1, 1) || (row, col) == (2, 2));
        let set = trace_contours(&grid, &ContourParams::default()).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.contours()[0].is_closed());
    }

    #[test]
    fn test_speckled_scene_scales_linearly() {
        // One ice cell every third cell: each is its own ring
        let grid = binary(300, 300, |row, col| row % 3 == 1 && col % 3 == 1);
        let start = std::time::Instant::now();
        let set = trace_contours(&grid, &ContourParams::default()).unwrap();
        let elapsed = start.elapsed();

        assert_eq!(set.len(), 100 * 100);
        assert!(set.iter().all(|c| c.is_closed() && c.len() == 5));
        assert!(elapsed.as_secs() < 5, "tracing took {:?}", elapsed);
    }

    #[test]
    fn test_continuous_values_interpolate() {
        let mut r: Raster<f64> = Raster::from_vec(vec![0.0, 0.0, 10.0, 10.0], 2, 2).unwrap();
        r.set_transform(GeoTransform::new(0.0, 0.0, 1.0, 1.0));
        let set = trace_contours(&r, &ContourParams { iso_value: 2.5 }).unwrap();
        let line = &set.contours()[0];
        for p in line.points() {
            // Quarter of the way from row 0 center to row 1 center
            assert_relative_eq!(p.y, 0.75, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_invalid_iso_value() {
        let grid = binary(3, 3, |row, _| row == 0);
        let result = trace_contours(&grid, &ContourParams { iso_value: f64::NAN });
        assert!(result.is_err());
    }
}
