//! Contour rasterization into a terminus point cloud

use std::collections::BTreeSet;
use terminus_core::raster::GeoTransform;
use terminus_core::vector::{Contour, Point, PointCloud};
use terminus_core::{Error, Result};

/// Slack, in cells, applied before flooring pixel coordinates.
///
/// A contour traced from a binary grid runs exactly along cell edges; the
/// slack keeps rounding noise from splitting such a line between the rows
/// on either side. Edge-aligned segments land on the increasing-row side.
const EDGE_SNAP: f64 = 1e-6;

fn cell_index(v: f64) -> i64 {
    (v + EDGE_SNAP).floor() as i64
}

/// Rasterize a contour and emit the centers of the cells it crosses.
///
/// The sampling grid shares `grid`'s origin and orientation and uses square
/// cells of `cell_size`. Every segment is walked cell by cell, so no crossed
/// cell is skipped however steep the segment. Points come out in row-major
/// cell order, one per cell.
///
/// # Errors
/// - `EmptySampling` if the contour has no points
/// - `InvalidParameter` if `cell_size` is not a positive finite number
pub fn sample_contour(contour: &Contour, grid: &GeoTransform, cell_size: f64) -> Result<PointCloud> {
    if !(cell_size.is_finite() && cell_size > 0.0) {
        return Err(Error::InvalidParameter {
            name: "cell_size",
            value: cell_size.to_string(),
            reason: "must be a positive number".into(),
        });
    }

    let sampling = grid.with_cell_size(cell_size);
    let pixels: Vec<(f64, f64)> = contour
        .points()
        .iter()
        .map(|p| sampling.geo_to_pixel(p.x, p.y))
        .collect();

    if pixels.iter().any(|(col, row)| !col.is_finite() || !row.is_finite()) {
        return Err(Error::InvalidParameter {
            name: "grid",
            value: format!("{:?}", grid),
            reason: "transform cannot be inverted".into(),
        });
    }

    let mut cells = BTreeSet::new();
    match pixels.as_slice() {
        [] => return Err(Error::EmptySampling),
        [single] => {
            cells.insert((cell_index(single.1), cell_index(single.0)));
        }
        _ => {
            for pair in pixels.windows(2) {
                traverse(pair[0], pair[1], &mut cells);
            }
        }
    }

    Ok(cells
        .into_iter()
        .map(|(row, col)| Point::from(sampling.fractional_to_geo(col as f64 + 0.5, row as f64 + 0.5)))
        .collect())
}

/// Grid traversal (Amanatides & Woo, 1987) from `a` to `b` in pixel
/// coordinates, inserting every visited `(row, col)`.
fn traverse(a: (f64, f64), b: (f64, f64), cells: &mut BTreeSet<(i64, i64)>) {
    let (mut col, mut row) = (cell_index(a.0), cell_index(a.1));
    let (end_col, end_row) = (cell_index(b.0), cell_index(b.1));
    cells.insert((row, col));

    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let step_col = if dx > 0.0 { 1 } else { -1 };
    let step_row = if dy > 0.0 { 1 } else { -1 };
    let (mut t_max_col, t_delta_col) = axis_setup(a.0, dx, col);
    let (mut t_max_row, t_delta_row) = axis_setup(a.1, dy, row);

    let steps = (end_col - col).abs() + (end_row - row).abs();
    for _ in 0..steps {
        let along_col = if col == end_col {
            false
        } else if row == end_row {
            true
        } else {
            t_max_col < t_max_row
        };

        if along_col {
            col += step_col;
            t_max_col += t_delta_col;
        } else {
            row += step_row;
            t_max_row += t_delta_row;
        }
        cells.insert((row, col));
    }
}

/// Parametric distance to the first cell boundary along one axis, and
/// between successive boundaries.
fn axis_setup(start: f64, delta: f64, cell: i64) -> (f64, f64) {
    if delta.abs() < f64::EPSILON {
        return (f64::INFINITY, f64::INFINITY);
    }
    let boundary = if delta > 0.0 { cell as f64 + 1.0 } else { cell as f64 };
    (((boundary - start) / delta).max(0.0), 1.0 / delta.abs())
}
