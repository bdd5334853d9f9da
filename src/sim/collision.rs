//! Overlap tests used by orbit capture and the reacquisition ray

use glam::Vec2;

/// Check whether two circles overlap (touching counts)
#[inline]
pub fn circles_overlap(center_a: Vec2, radius_a: f32, center_b: Vec2, radius_b: f32) -> bool {
    let reach = radius_a + radius_b;
    center_a.distance_squared(center_b) <= reach * reach
}

/// Closest point to `p` on the segment `start..end`
pub fn closest_point_on_segment(p: Vec2, start: Vec2, end: Vec2) -> Vec2 {
    let seg = end - start;
    let len_sq = seg.length_squared();
    if len_sq <= f32::EPSILON {
        return start;
    }
    let t = ((p - start).dot(seg) / len_sq).clamp(0.0, 1.0);
    start + seg * t
}

/// Check whether a circle touches the segment `start..end`
pub fn circle_segment_overlap(center: Vec2, radius: f32, start: Vec2, end: Vec2) -> bool {
    let closest = closest_point_on_segment(center, start, end);
    center.distance_squared(closest) <= radius * radius
}
