use tracing::warn;

use crate::math::{Axis, Point3};
use crate::operations::query::Aabb;

use super::segment::Segment;

/// An ordered walk through the segment graph.
///
/// A closed curve repeats its first index at the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Curve {
    indices: Vec<usize>,
    closed: bool,
}

impl Curve {
    /// The index sequence, with the start repeated at the end when closed.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of distinct points on the curve.
    #[must_use]
    pub fn point_count(&self) -> usize {
        if self.closed {
            self.indices.len() - 1
        } else {
            self.indices.len()
        }
    }

    /// The distinct point indices in walk order.
    #[must_use]
    pub fn points(&self) -> &[usize] {
        &self.indices[..self.point_count()]
    }

    #[must_use]
    pub fn first(&self) -> Option<usize> {
        self.indices.first().copied()
    }

    #[must_use]
    pub fn last(&self) -> Option<usize> {
        self.indices.last().copied()
    }

    /// Extent of the curve's points along `axis`.
    #[must_use]
    pub fn span(&self, positions: &[Point3], axis: Axis) -> f64 {
        Aabb::from_points(self.points().iter().map(|&i| &positions[i]))
            .map_or(0.0, |aabb| aabb.extent(axis))
    }
}

/// Lazily walks the connected components of a segment graph.
///
/// Created by [`find_curves`]. Each call to `next` starts from the lowest
/// unvisited point that still has segments, extends the path forward and
/// then backward through unconsumed segments to unvisited points, and
/// yields it. A point is never part of two curves.
#[derive(Debug)]
pub struct Curves {
    /// Per point: `(neighbor, segment index)`.
    adjacency: Vec<Vec<(usize, usize)>>,
    consumed: Vec<bool>,
    visited: Vec<bool>,
    cursor: usize,
}

/// Assembles segments over `point_count` points into curves.
///
/// Segments referencing a point `>= point_count` are skipped.
#[must_use]
pub fn find_curves(segments: &[Segment], point_count: usize) -> Curves {
    let mut adjacency = vec![Vec::new(); point_count];
    let mut skipped = 0usize;
    for (i, s) in segments.iter().enumerate() {
        if s.start >= point_count || s.end >= point_count || s.start == s.end {
            skipped += 1;
            continue;
        }
        adjacency[s.start].push((s.end, i));
        adjacency[s.end].push((s.start, i));
    }
    if skipped > 0 {
        warn!(skipped, point_count, "ignored invalid contour segments");
    }
    Curves {
        adjacency,
        consumed: vec![false; segments.len()],
        visited: vec![false; point_count],
        cursor: 0,
    }
}

impl Curves {
    /// Takes the next usable segment from `from`: one leading to an unvisited
    /// point, or back to `start` when closing is allowed.
    fn step(&mut self, from: usize, start: Option<usize>) -> Option<usize> {
        let mut chosen = None;
        for &(next, seg) in &self.adjacency[from] {
            if self.consumed[seg] {
                continue;
            }
            if !self.visited[next] || Some(next) == start {
                chosen = Some((next, seg));
                break;
            }
        }
        let (next, seg) = chosen?;
        self.consumed[seg] = true;
        Some(next)
    }

    fn consume_dead_segments(&mut self, v: usize) {
        for &(next, seg) in &self.adjacency[v] {
            if self.visited[next] {
                self.consumed[seg] = true;
            }
        }
    }
}

impl Iterator for Curves {
    type Item = Curve;

    fn next(&mut self) -> Option<Curve> {
        while self.cursor < self.adjacency.len()
            && (self.visited[self.cursor] || self.adjacency[self.cursor].is_empty())
        {
            self.cursor += 1;
        }
        if self.cursor >= self.adjacency.len() {
            return None;
        }
        let start = self.cursor;

        self.visited[start] = true;
        let mut forward = vec![start];
        let mut closed = false;
        let mut current = start;
        while let Some(next) = self.step(current, (forward.len() > 2).then_some(start)) {
            forward.push(next);
            if next == start {
                closed = true;
                break;
            }
            self.visited[next] = true;
            current = next;
        }

        let mut backward = Vec::new();
        if !closed {
            current = start;
            while let Some(next) = self.step(current, None) {
                self.visited[next] = true;
                backward.push(next);
                current = next;
            }
        }

        backward.reverse();
        backward.extend(forward);
        for &v in &backward {
            self.consume_dead_segments(v);
        }

        Some(Curve {
            indices: backward,
            closed,
        })
    }
}

/// Picks the curve with the largest extent along `axis`; ties keep the first.
#[must_use]
pub fn select_widest<I>(curves: I, positions: &[Point3], axis: Axis) -> Option<Curve>
where
    I: IntoIterator<Item = Curve>,
{
    let mut best: Option<(f64, Curve)> = None;
    for curve in curves {
        let span = curve.span(positions, axis);
        match &best {
            Some((best_span, _)) if span <= *best_span => {}
            _ => best = Some((span, curve)),
        }
    }
    best.map(|(_, curve)| curve)
}
