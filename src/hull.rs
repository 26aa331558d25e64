//! 2D convex hull and polygon area.
//!
//! The hull is built with Andrew's monotone chain over points sorted by
//! `(x, y)`. Only strict left turns are kept, so collinear boundary points
//! never appear on the hull and the result is canonical: the same point set
//! in any order, with any duplicates, yields the same vertex sequence.

use std::cmp::Ordering;

use glam::DVec2;

/// Twice the signed area of triangle `(a, b, c)`; positive for a left turn.
#[inline]
fn cross(a: DVec2, b: DVec2, c: DVec2) -> f64 {
    (b - a).perp_dot(c - a)
}

#[inline]
fn lexicographic(a: &DVec2, b: &DVec2) -> Ordering {
    a.x.total_cmp(&b.x).then_with(|| a.y.total_cmp(&b.y))
}

/// Sort by `(x, y)` and drop exact duplicates.
///
/// Adding zero turns `-0.0` into `0.0`, so numerically equal coordinates
/// also compare equal under `total_cmp`.
fn sorted_unique(points: &[DVec2]) -> Vec<DVec2> {
    let mut sorted: Vec<DVec2> = points.iter().map(|&p| p + DVec2::ZERO).collect();
    sorted.sort_unstable_by(lexicographic);
    sorted.dedup();
    sorted
}

/// Append `p` to a monotone chain, popping vertices that stop turning left.
#[inline]
fn push_left_turn(chain: &mut Vec<DVec2>, p: DVec2) {
    while let [.., a, b] = chain.as_slice()
        && cross(*a, *b, p) <= 0.0
    {
        chain.pop();
    }
    chain.push(p);
}

/// Counter-clockwise hull vertices, starting at the smallest `(x, y)`.
///
/// Fewer than three distinct points come back deduplicated and sorted.
/// Collinear input collapses to its two extreme points.
#[must_use]
pub fn convex_hull(points: &[DVec2]) -> Vec<DVec2> {
    let sorted = sorted_unique(points);
    if sorted.len() < 3 {
        return sorted;
    }

    let mut lower = Vec::with_capacity(sorted.len());
    for &p in &sorted {
        push_left_turn(&mut lower, p);
    }
    let mut upper = Vec::with_capacity(sorted.len());
    for &p in sorted.iter().rev() {
        push_left_turn(&mut upper, p);
    }

    // Each chain ends where the other begins.
    lower.pop();
    upper.pop();
    lower.append(&mut upper);
    lower
}

/// Shoelace area of a simple polygon, independent of winding.
#[must_use]
pub fn polygon_area(vertices: &[DVec2]) -> f64 {
    if vertices.len() < 3 {
        return 0.0;
    }
    let twice: f64 = vertices
        .iter()
        .zip(vertices.iter().cycle().skip(1))
        .map(|(a, b)| a.perp_dot(*b))
        .sum();
    (twice * 0.5).abs()
}

/// Area of the convex hull of `points`; 0 for degenerate input.
#[must_use]
pub fn hull_area(points: &[DVec2]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    polygon_area(&convex_hull(points))
}
