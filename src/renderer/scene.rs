//! Scene building and layout math
//!
//! Turns a `GameState` into a triangle list in cell coordinates (x = column,
//! y = row, y down). Kept free of GPU types so it runs in native tests.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors, with_alpha};
use crate::consts::*;
use crate::settings::Dimension;
use crate::sim::{GameState, ParticleTint, PickupKind};

/// Widest the canvas may get (CSS pixels)
pub const MAX_CANVAS_WIDTH: f32 = 640.0;
/// Cell size the pixel-based effect sizes were tuned at
pub const REFERENCE_CELL_PX: f32 = 26.0;
/// Far-row width in the depth projection, relative to the near row
pub const DEPTH_FAR_SCALE: f32 = 0.6;

/// Highlighted cell where the ship starts
const START_CELL: Vec2 = Vec2::new(PLAYER_MAX_X, PLAYER_MAX_Y);

/// Convert a pixel size at the reference cell size into cells
#[inline]
fn px(v: f32) -> f32 {
    v / REFERENCE_CELL_PX
}

/// Largest whole-pixel cell that fits the available area (at least 1)
pub fn fit_cell(available_width: f32, available_height: f32) -> u32 {
    let width = MAX_CANVAS_WIDTH.min(available_width.max(0.0));
    let height = available_height.max(0.0);
    let cell = (width / GRID_COLS as f32).min(height / GRID_ROWS as f32).floor();
    (cell as u32).max(1)
}

/// Area left for the canvas once the side panel is placed. Wide windows put
/// the panel beside the board, narrow ones below it.
pub fn available_area(window: Vec2, padding: Vec2, panel: Vec2, gap: f32) -> Vec2 {
    let mut area = window - padding;
    if window.x > 900.0 {
        area.x -= panel.x + gap;
    } else {
        area.y -= panel.y + gap;
    }
    area.max(Vec2::ZERO)
}

/// Canvas size in CSS pixels for a cell size
pub fn canvas_size(cell: u32) -> (u32, u32) {
    (cell * GRID_COLS, cell * GRID_ROWS)
}

/// Cell coordinates to normalized device coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Projection {
    pub dimension: Dimension,
}

impl Projection {
    pub fn new(dimension: Dimension) -> Self {
        Self { dimension }
    }

    pub fn to_ndc(&self, p: Vec2) -> Vec2 {
        let cols = GRID_COLS as f32;
        let rows = GRID_ROWS as f32;
        let x = match self.dimension {
            Dimension::Flat => p.x,
            Dimension::Depth => {
                // Far rows (top) pinch toward the center column
                let t = (p.y / rows).clamp(0.0, 1.0);
                let scale = DEPTH_FAR_SCALE + (1.0 - DEPTH_FAR_SCALE) * t;
                cols * 0.5 + (p.x - cols * 0.5) * scale
            }
        };
        Vec2::new(x / cols * 2.0 - 1.0, 1.0 - p.y / rows * 2.0)
    }
}

/// Per-frame render switches
#[derive(Debug, Clone, Copy, Default)]
pub struct SceneOptions {
    /// Seconds since start, drives the grid shimmer
    pub time: f32,
    pub reduced_motion: bool,
}

/// Build the full frame
pub fn build_scene(state: &GameState, options: SceneOptions) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(8192);
    background(&mut vertices, options);
    effects(&mut vertices, state);
    entities(&mut vertices, state);
    vertices
}

fn background(out: &mut Vec<Vertex>, options: SceneOptions) {
    let inset = px(1.0);

    for y in 0..GRID_ROWS {
        let depth = y as f32 / (GRID_ROWS - 1).max(1) as f32;
        for x in 0..GRID_COLS {
            let noise = (if x % 2 == 0 { 6.0 } else { -4.0 })
                + (if y % 2 == 0 { 4.0 } else { 0.0 });
            let color = if x as f32 == START_CELL.x && y as f32 == START_CELL.y {
                colors::START_CELL
            } else if y == 0 {
                colors::SPAWN_ROW
            } else {
                [
                    (6.0 + depth * 10.0 + noise) / 255.0,
                    (58.0 + depth * 34.0 + noise) / 255.0,
                    (90.0 + depth * 48.0 + noise) / 255.0,
                    0.94,
                ]
            };
            let min = Vec2::new(x as f32, y as f32);
            out.extend(shapes::rect(
                min + Vec2::splat(inset),
                min + Vec2::splat(1.0 - inset),
                color,
            ));
        }
    }

    for c in 0..=GRID_COLS {
        for r in 0..=GRID_ROWS {
            let pulse = if options.reduced_motion {
                0.0
            } else {
                ((options.time * 21.0 + (c + r) as f32) * 0.08).sin() * 0.2
            };
            out.extend(shapes::cross(
                Vec2::new(c as f32, r as f32),
                0.18,
                px(1.1),
                with_alpha(colors::GRID_CROSS, 1.0 + pulse),
            ));
        }
    }
}

fn effects(out: &mut Vec<Vertex>, state: &GameState) {
    for particle in &state.particles {
        let tint = match particle.payload.tint {
            ParticleTint::Spark => colors::SPARK,
            ParticleTint::Crash => colors::CRASH,
        };
        out.extend(shapes::circle(
            particle.pos,
            px(particle.payload.size),
            with_alpha(tint, particle.payload.life),
            8,
        ));
    }

    for wave in &state.shockwaves {
        let tint = match wave.tint {
            ParticleTint::Spark => colors::SPARK,
            ParticleTint::Crash => colors::CRASH,
        };
        out.extend(shapes::ring(
            wave.pos,
            (wave.radius - px(2.0)).max(0.0),
            wave.radius,
            with_alpha(tint, wave.alpha),
            24,
        ));
    }
}

fn entities(out: &mut Vec<Vertex>, state: &GameState) {
    let ship = state.player.ship.pos;

    // Engine trail
    out.extend(shapes::rect(
        ship + Vec2::new(-px(0.5), px(6.0)),
        ship + Vec2::new(px(0.5), 0.7),
        colors::PLAYER_TRAIL,
    ));
    out.extend(shapes::ship(ship, colors::PLAYER, -1.0));

    for enemy in &state.enemies {
        out.extend(shapes::ship(enemy.pos, colors::ENEMY, 1.0));
    }

    for pickup in &state.pickups {
        let fill = match pickup.payload.kind {
            PickupKind::Heal => colors::HEAL,
            PickupKind::Pulse => colors::PULSE,
        };
        out.extend(shapes::circle(pickup.pos, px(6.0), fill, 16));
        out.extend(shapes::ring(pickup.pos, px(6.0), px(8.0), colors::PICKUP_RIM, 16));
    }

    for shot in &state.player_shots {
        glowing_dot(out, shot.pos, colors::PLAYER_SHOT);
    }
    for shot in &state.enemy_shots {
        glowing_dot(out, shot.pos, colors::ENEMY_SHOT);
    }
}

fn glowing_dot(out: &mut Vec<Vertex>, pos: Vec2, color: [f32; 4]) {
    out.extend(shapes::circle(pos, px(7.0), with_alpha(color, 0.25), 10));
    out.extend(shapes::circle(pos, px(3.0), color, 10));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Enemy, EnemyMotion, GamePhase};
    use glam::IVec2;

    #[test]
    fn test_fit_cell() {
        // Width-bound: 640 / 16 = 40
        assert_eq!(fit_cell(1920.0, 2000.0), 40);
        // Height-bound: 600 / 24 = 25
        assert_eq!(fit_cell(1920.0, 600.0), 25);
        // Never below one pixel
        assert_eq!(fit_cell(0.0, 0.0), 1);
        assert_eq!(canvas_size(25), (400, 600));
    }

    #[test]
    fn test_available_area_panel_placement() {
        let wide = available_area(
            Vec2::new(1200.0, 800.0),
            Vec2::new(40.0, 40.0),
            Vec2::new(260.0, 500.0),
            20.0,
        );
        assert_eq!(wide, Vec2::new(880.0, 760.0));

        let narrow = available_area(
            Vec2::new(400.0, 800.0),
            Vec2::new(20.0, 20.0),
            Vec2::new(380.0, 120.0),
            10.0,
        );
        assert_eq!(narrow, Vec2::new(380.0, 650.0));
    }

    #[test]
    fn test_flat_projection_corners() {
        let proj = Projection::new(Dimension::Flat);
        assert_eq!(proj.to_ndc(Vec2::ZERO), Vec2::new(-1.0, 1.0));
        assert_eq!(
            proj.to_ndc(Vec2::new(GRID_COLS as f32, GRID_ROWS as f32)),
            Vec2::new(1.0, -1.0)
        );
    }

    #[test]
    fn test_depth_projection_pinches_far_rows() {
        let proj = Projection::new(Dimension::Depth);
        let far = proj.to_ndc(Vec2::new(0.0, 0.0));
        let near = proj.to_ndc(Vec2::new(0.0, GRID_ROWS as f32));
        assert!((far.x + DEPTH_FAR_SCALE).abs() < 1e-6);
        assert!((near.x + 1.0).abs() < 1e-6);
        // Center column does not move
        let mid = proj.to_ndc(Vec2::new(GRID_COLS as f32 * 0.5, 3.0));
        assert!(mid.x.abs() < 1e-6);
    }

    #[test]
    fn test_scene_grows_with_entities() {
        let mut state = GameState::new(1);
        state.phase = GamePhase::Running;
        let base = build_scene(&state, SceneOptions::default()).len();

        state.enemies.push(Enemy::new(
            Vec2::new(4.0, 4.0),
            Vec2::ZERO,
            EnemyMotion {
                step: IVec2::new(0, 1),
                fan_index: 0.0,
            },
        ));
        let with_enemy = build_scene(&state, SceneOptions::default()).len();
        assert_eq!(with_enemy, base + 6);
    }
}
