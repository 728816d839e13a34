//! Shape generation for 2D primitives
//!
//! Stateless adapter from a [`FrameView`] to triangle-list vertices in
//! normalised device coordinates. Each entity kind has its own builder; the
//! simulation never sees any of this.

use glam::DVec2;
use std::f64::consts::TAU;

use super::vertex::{Vertex, colors};
use crate::consts::AVATAR_RADIUS;
use crate::heading_to_dir;
use crate::sim::{FrameView, SpearView, TargetView};

/// Segments used for circles
pub const CIRCLE_SEGMENTS: u32 = 32;
/// Charge bar height in pixels
pub const CHARGE_BAR_HEIGHT: f64 = 20.0;

/// Colors used by [`build_frame`]
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub avatar: [f32; 4],
    pub spear: [f32; 4],
    pub target: [f32; 4],
    pub target_core: [f32; 4],
    pub target_killed: [f32; 4],
    pub charge_bar: [f32; 4],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            avatar: colors::AVATAR,
            spear: colors::SPEAR,
            target: colors::TARGET,
            target_core: colors::TARGET_CORE,
            target_killed: colors::TARGET_KILLED,
            charge_bar: colors::CHARGE_BAR,
        }
    }
}

/// Playfield pixels (Y down) to NDC (Y up)
#[inline]
pub fn to_ndc(p: DVec2, screen: DVec2) -> [f32; 2] {
    [
        (2.0 * p.x / screen.x - 1.0) as f32,
        (1.0 - 2.0 * p.y / screen.y) as f32,
    ]
}

fn vertex(p: DVec2, screen: DVec2, color: [f32; 4]) -> Vertex {
    let [x, y] = to_ndc(p, screen);
    Vertex::new(x, y, color)
}

/// Two triangles for the quad a-b-c-d (in winding order)
fn quad(corners: [DVec2; 4], screen: DVec2, color: [f32; 4]) -> [Vertex; 6] {
    let [a, b, c, d] = corners.map(|p| vertex(p, screen, color));
    [a, b, c, a, c, d]
}

/// Corners of a spear as an oriented rectangle centred on `pos`, in winding
/// order (front-left, back-left, back-right, front-right).
pub fn spear_corners(pos: DVec2, angle_deg: f64, length: f64, width: f64) -> [DVec2; 4] {
    let along = heading_to_dir(angle_deg) * (length / 2.0);
    let across = along.perp().normalize_or_zero() * (width / 2.0);
    [
        pos + along + across,
        pos - along + across,
        pos - along - across,
        pos + along - across,
    ]
}

/// Filled circle as a triangle fan (expanded to a list)
pub fn circle(
    center: DVec2,
    radius: f64,
    segments: u32,
    screen: DVec2,
    color: [f32; 4],
) -> Vec<Vertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity(segments as usize * 3);
    let point = |i: u32| {
        let theta = TAU * i as f64 / segments as f64;
        center + DVec2::new(theta.cos(), theta.sin()) * radius
    };
    for i in 0..segments {
        vertices.push(vertex(center, screen, color));
        vertices.push(vertex(point(i), screen, color));
        vertices.push(vertex(point(i + 1), screen, color));
    }
    vertices
}

/// Bottom-edge bar filled to `fraction` of the screen width
pub fn charge_bar(fraction: f64, screen: DVec2, color: [f32; 4]) -> Vec<Vertex> {
    let fraction = fraction.clamp(0.0, 1.0);
    if fraction <= 0.0 {
        return Vec::new();
    }
    let right = screen.x * fraction;
    let top = screen.y - CHARGE_BAR_HEIGHT;
    quad(
        [
            DVec2::new(0.0, top),
            DVec2::new(0.0, screen.y),
            DVec2::new(right, screen.y),
            DVec2::new(right, top),
        ],
        screen,
        color,
    )
    .to_vec()
}

fn spear(view: &SpearView, screen: DVec2, palette: &Palette) -> Vec<Vertex> {
    // Destroyed spears only feed the decay hook
    if view.destroyed {
        return Vec::new();
    }
    let corners = spear_corners(view.pos, view.angle, view.length, view.width);
    quad(corners, screen, palette.spear).to_vec()
}

fn target(view: &TargetView, screen: DVec2, palette: &Palette) -> Vec<Vertex> {
    if view.dead {
        return circle(
            view.pos,
            view.radius,
            CIRCLE_SEGMENTS,
            screen,
            palette.target_killed,
        );
    }
    let mut vertices = circle(view.pos, view.radius, CIRCLE_SEGMENTS, screen, palette.target);
    // Core shrinks with remaining health
    if view.max_hp > 0 {
        let health = view.hp as f64 / view.max_hp as f64;
        vertices.extend(circle(
            view.pos,
            view.radius * 0.6 * health,
            CIRCLE_SEGMENTS,
            screen,
            palette.target_core,
        ));
    }
    vertices
}

/// All vertices for one frame: targets, avatar, spears, then the charge bar
pub fn build_frame(view: &FrameView, palette: &Palette) -> Vec<Vertex> {
    let screen = DVec2::new(view.width, view.height);
    let mut vertices = Vec::new();
    for t in &view.targets {
        vertices.extend(target(t, screen, palette));
    }
    vertices.extend(circle(
        view.avatar,
        AVATAR_RADIUS,
        CIRCLE_SEGMENTS,
        screen,
        palette.avatar,
    ));
    for s in &view.spears {
        vertices.extend(spear(s, screen, palette));
    }
    vertices.extend(charge_bar(view.charge, screen, palette.charge_bar));
    vertices
}
