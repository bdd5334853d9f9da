//! Debug overlays for orbit state

use glam::Vec2;

use super::{Color, DrawSink, colors};
use crate::sim::OrbitData;

/// Half-length of the ground line drawn along the surface tangent
const GROUND_LINE_HALF: f32 = 100.0;
const GUIDE_THICKNESS: f32 = 4.0;
const EDGE_DOT_RADIUS: f32 = 5.0;

/// Draw the anchor guides of an orbiting entity
///
/// Height line from the entity to the surface, the local ground line, the
/// circle the entity is orbiting on, and the surface contact point.
pub fn orbit_guides(sink: &mut impl DrawSink, data: &OrbitData) {
    let color: Color = colors::ORBIT_GUIDE;

    sink.line(data.curr_pos, data.edge, GUIDE_THICKNESS, color);

    let ground_dir = Vec2::new(-data.dir.y, data.dir.x);
    let line_start = data.edge - ground_dir * GROUND_LINE_HALF;
    let line_end = data.edge + ground_dir * GROUND_LINE_HALF;
    sink.line(line_start, line_end, GUIDE_THICKNESS, color);

    sink.circle_lines(data.orbit_center, data.body_radius + data.height, color);
    sink.circle(data.edge, EDGE_DOT_RADIUS, color);
}

/// Draw the reacquisition ray
pub fn orbit_ray(sink: &mut impl DrawSink, start: Vec2, end: Vec2) {
    sink.line(start, end, 1.0, colors::RAY);
}
