//! Input folding
//!
//! DOM listeners feed raw key and pointer events into `InputState`; the frame
//! loop samples it once per step with `snapshot()`. Nothing here touches the
//! game state directly.

use glam::Vec2;

use crate::settings::ControlMode;
use crate::sim::TickInput;

/// Fraction of the canvas height used as the pointer steering anchor
pub const POINTER_ANCHOR_Y: f32 = 0.8;

/// Direction bound to a key, if any
pub fn direction_for_key(key: &str) -> Option<Vec2> {
    match key {
        "ArrowLeft" | "a" | "A" => Some(Vec2::new(-1.0, 0.0)),
        "ArrowRight" | "d" | "D" => Some(Vec2::new(1.0, 0.0)),
        "ArrowUp" | "w" | "W" => Some(Vec2::new(0.0, -1.0)),
        "ArrowDown" | "s" | "S" => Some(Vec2::new(0.0, 1.0)),
        _ => None,
    }
}

pub fn is_fire_key(key: &str) -> bool {
    key == " " || key == "Spacebar"
}

pub fn is_pause_key(key: &str) -> bool {
    matches!(key, "p" | "P" | "Escape")
}

/// Steering direction from a pointer position relative to the canvas rect.
/// Each axis is the sign of the offset from the anchor (center x, 80% y).
pub fn pointer_direction(pointer: Vec2, rect_origin: Vec2, rect_size: Vec2) -> Vec2 {
    let anchor = rect_origin + Vec2::new(rect_size.x * 0.5, rect_size.y * POINTER_ANCHOR_Y);
    let offset = pointer - anchor;
    Vec2::new(sign(offset.x), sign(offset.y))
}

/// Letter keys fold to lowercase so Shift or CapsLock changes mid-hold
/// still release the same entry
fn canonical_key(key: &str) -> String {
    if key.chars().count() == 1 {
        key.to_lowercase()
    } else {
        key.to_string()
    }
}

fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Accumulated input between simulation steps
#[derive(Debug, Clone, Default)]
pub struct InputState {
    mode: ControlMode,
    /// Held direction keys, most recent last
    held: Vec<String>,
    /// Pointer steering while the pointer is down (mobile)
    pointer_dir: Option<Vec2>,
    fire_key_held: bool,
    pointer_held: bool,
    fire_pressed: bool,
    pause: bool,
}

impl InputState {
    pub fn new(mode: ControlMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn set_mode(&mut self, mode: ControlMode) {
        self.mode = mode;
        self.release_all();
    }

    /// Returns true when the key was consumed (caller should prevent default)
    pub fn key_down(&mut self, key: &str, repeat: bool) -> bool {
        if is_pause_key(key) {
            if !repeat {
                self.pause = true;
            }
            return true;
        }
        if is_fire_key(key) {
            if !self.fire_key_held {
                self.fire_pressed = true;
            }
            self.fire_key_held = true;
            return true;
        }
        if direction_for_key(key).is_some() {
            let key = canonical_key(key);
            self.held.retain(|k| *k != key);
            self.held.push(key);
            return true;
        }
        false
    }

    pub fn key_up(&mut self, key: &str) {
        if is_fire_key(key) {
            self.fire_key_held = false;
        } else {
            let key = canonical_key(key);
            self.held.retain(|k| *k != key);
        }
    }

    /// Pointer down on the canvas; ignored outside mobile mode
    pub fn pointer_down(&mut self, direction: Vec2) {
        if self.mode != ControlMode::Mobile {
            return;
        }
        if !self.pointer_held {
            self.fire_pressed = true;
        }
        self.pointer_held = true;
        self.pointer_dir = Some(direction);
    }

    pub fn pointer_move(&mut self, direction: Vec2) {
        if self.mode == ControlMode::Mobile && self.pointer_held {
            self.pointer_dir = Some(direction);
        }
    }

    pub fn pointer_up(&mut self) {
        self.pointer_held = false;
        self.pointer_dir = None;
    }

    /// Request a pause toggle (pause button)
    pub fn request_pause(&mut self) {
        self.pause = true;
    }

    /// Drop every held key and pointer (focus lost)
    pub fn release_all(&mut self) {
        self.held.clear();
        self.pointer_dir = None;
        self.fire_key_held = false;
        self.pointer_held = false;
        self.fire_pressed = false;
    }

    /// Sample the current input
    pub fn snapshot(&self) -> TickInput {
        let direction = self
            .pointer_dir
            .or_else(|| self.held.last().and_then(|k| direction_for_key(k)))
            .unwrap_or(Vec2::ZERO);

        TickInput {
            direction,
            firing: self.fire_key_held || self.pointer_held,
            fire_pressed: self.fire_pressed,
            pause: self.pause,
        }
    }

    /// Clear one-shot inputs after a step consumed them
    pub fn clear_one_shots(&mut self) {
        self.fire_pressed = false;
        self.pause = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keymap() {
        assert_eq!(direction_for_key("ArrowLeft"), Some(Vec2::new(-1.0, 0.0)));
        assert_eq!(direction_for_key("s"), Some(Vec2::new(0.0, 1.0)));
        assert_eq!(direction_for_key("q"), None);
        assert!(is_fire_key(" "));
        assert!(is_pause_key("Escape"));
        assert!(!is_pause_key("Enter"));
    }

    #[test]
    fn test_most_recent_key_wins() {
        let mut input = InputState::new(ControlMode::Desktop);
        input.key_down("ArrowLeft", false);
        input.key_down("w", false);
        assert_eq!(input.snapshot().direction, Vec2::new(0.0, -1.0));

        input.key_up("w");
        assert_eq!(input.snapshot().direction, Vec2::new(-1.0, 0.0));

        input.key_up("ArrowLeft");
        assert_eq!(input.snapshot().direction, Vec2::ZERO);
    }

    #[test]
    fn test_key_released_with_other_case() {
        let mut input = InputState::new(ControlMode::Desktop);
        input.key_down("a", false);
        // Shift went down while A was held
        input.key_up("A");
        assert_eq!(input.snapshot().direction, Vec2::ZERO);

        input.key_down("W", false);
        input.key_down("w", true);
        input.key_up("w");
        assert_eq!(input.snapshot().direction, Vec2::ZERO);
    }

    #[test]
    fn test_fire_edge_and_hold() {
        let mut input = InputState::new(ControlMode::Desktop);
        assert!(input.key_down(" ", false));
        let snap = input.snapshot();
        assert!(snap.fire_pressed && snap.firing);

        input.clear_one_shots();
        // Key repeat does not re-trigger the edge
        input.key_down(" ", true);
        let snap = input.snapshot();
        assert!(!snap.fire_pressed && snap.firing);

        input.key_up(" ");
        assert!(!input.snapshot().firing);
    }

    #[test]
    fn test_pause_is_one_shot() {
        let mut input = InputState::new(ControlMode::Desktop);
        input.key_down("p", false);
        assert!(input.snapshot().pause);
        input.clear_one_shots();
        assert!(!input.snapshot().pause);
        input.key_down("Escape", true);
        assert!(!input.snapshot().pause);
    }

    #[test]
    fn test_unbound_key_not_consumed() {
        let mut input = InputState::new(ControlMode::Desktop);
        assert!(!input.key_down("Tab", false));
        assert_eq!(input.snapshot().direction, Vec2::ZERO);
    }

    #[test]
    fn test_pointer_steering_only_on_mobile() {
        let mut desktop = InputState::new(ControlMode::Desktop);
        desktop.pointer_down(Vec2::new(1.0, 0.0));
        assert!(!desktop.snapshot().firing);

        let mut mobile = InputState::new(ControlMode::Mobile);
        mobile.pointer_down(Vec2::new(1.0, -1.0));
        let snap = mobile.snapshot();
        assert!(snap.firing && snap.fire_pressed);
        assert_eq!(snap.direction, Vec2::new(1.0, -1.0));

        mobile.pointer_move(Vec2::new(-1.0, 0.0));
        assert_eq!(mobile.snapshot().direction, Vec2::new(-1.0, 0.0));

        mobile.pointer_up();
        let snap = mobile.snapshot();
        assert!(!snap.firing);
        assert_eq!(snap.direction, Vec2::ZERO);
    }

    #[test]
    fn test_pointer_direction_from_anchor() {
        let origin = Vec2::new(10.0, 20.0);
        let size = Vec2::new(400.0, 600.0);
        // Anchor is (210, 500)
        assert_eq!(
            pointer_direction(Vec2::new(100.0, 100.0), origin, size),
            Vec2::new(-1.0, -1.0)
        );
        assert_eq!(
            pointer_direction(Vec2::new(210.0, 560.0), origin, size),
            Vec2::new(0.0, 1.0)
        );
    }

    #[test]
    fn test_release_all_on_blur() {
        let mut input = InputState::new(ControlMode::Desktop);
        input.key_down("d", false);
        input.key_down(" ", false);
        input.release_all();
        let snap = input.snapshot();
        assert_eq!(snap.direction, Vec2::ZERO);
        assert!(!snap.firing && !snap.fire_pressed);
    }
}
