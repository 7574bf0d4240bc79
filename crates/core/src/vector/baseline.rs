//! Fixed reference line across the fjord

use super::{Line, Point};
use crate::error::{Error, Result};

/// The terminus-width reference line.
///
/// Drawn once across the valley and shared by every epoch. Only its first
/// and last vertices matter: they mark the valley walls the terminus is
/// anchored to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baseline {
    start: Point,
    end: Point,
}

impl Baseline {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Build from the vertices of a drawn polyline, keeping its first and
    /// last vertex.
    pub fn from_vertices(vertices: &[Point]) -> Result<Self> {
        match vertices {
            [first, .., last] => Ok(Self::new(*first, *last)),
            _ => Err(Error::DegenerateBaseline),
        }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn as_line(&self) -> Line {
        Line::new(self.start, self.end)
    }
}
