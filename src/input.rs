use crate::constants::{
    DRAG_PAN_MULT, DRAG_Z_SENSITIVITY, PINCH_SENSITIVITY, WHEEL_PINCH_EMULATION_FACTOR,
    WHEEL_SENSITIVITY,
};
use glam::Vec2;
use smallvec::SmallVec;

/// One camera update derived from an input event.
///
/// `advance` is handed to `ParticleField::advance` (positive = forward) and
/// `pan` is added to `CameraState::pan`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraDelta {
    pub advance: f32,
    pub pan: Vec2,
}

impl CameraDelta {
    pub fn advance(dz: f32) -> Self {
        Self {
            advance: dz,
            pan: Vec2::ZERO,
        }
    }
}

#[inline]
pub fn wheel_delta(delta_y: f32, pinch_emulation: bool) -> CameraDelta {
    let dy = if pinch_emulation {
        delta_y * WHEEL_PINCH_EMULATION_FACTOR
    } else {
        delta_y
    };
    CameraDelta::advance(dy * WHEEL_SENSITIVITY)
}

#[inline]
pub fn pinch_delta(previous_distance: f32, current_distance: f32) -> CameraDelta {
    // spreading fingers moves forward
    CameraDelta::advance(-(current_distance - previous_distance) * PINCH_SENSITIVITY)
}

#[inline]
pub fn drag_delta(movement: Vec2, fov: f32) -> CameraDelta {
    CameraDelta {
        advance: -movement.y * DRAG_Z_SENSITIVITY,
        pan: -(movement / fov) * DRAG_PAN_MULT,
    }
}

/// Tracks active contacts and turns pointer/touch streams into camera deltas.
///
/// Pointer and touch input keep separate references because browsers deliver
/// only one of the two families.
#[derive(Default)]
pub struct GestureController {
    // insertion order matters: the first two contacts define the pinch
    pointers: SmallVec<[(i32, Vec2); 4]>,
    last_pinch_distance: Option<f32>,
    last_drag: Option<Vec2>,
    last_touch_distance: Option<f32>,
    last_touch: Option<Vec2>,
}

impl GestureController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_pointers(&self) -> usize {
        self.pointers.len()
    }

    pub fn is_tracking(&self, id: i32) -> bool {
        self.pointers.iter().any(|(pid, _)| *pid == id)
    }

    pub fn pointer_down(&mut self, id: i32, pos: Vec2) {
        match self.pointers.iter_mut().find(|(pid, _)| *pid == id) {
            Some(entry) => entry.1 = pos,
            None => self.pointers.push((id, pos)),
        }
        if self.pointers.len() == 1 {
            self.last_drag = Some(pos);
        }
    }

    /// Returns `None` for untracked pointers and for the first move of a
    /// pinch, which only establishes the reference distance.
    pub fn pointer_move(&mut self, id: i32, pos: Vec2, fov: f32) -> Option<CameraDelta> {
        let entry = self.pointers.iter_mut().find(|(pid, _)| *pid == id)?;
        entry.1 = pos;
        if self.pointers.len() >= 2 {
            let d = self.pointers[0].1.distance(self.pointers[1].1);
            let delta = self.last_pinch_distance.map(|prev| pinch_delta(prev, d));
            self.last_pinch_distance = Some(d);
            delta
        } else {
            let delta = self.last_drag.map(|prev| drag_delta(pos - prev, fov));
            self.last_drag = Some(pos);
            delta
        }
    }

    /// Handles up, cancel and leave alike.
    pub fn pointer_up(&mut self, id: i32) {
        self.pointers.retain(|(pid, _)| *pid != id);
        if self.pointers.len() < 2 {
            self.last_pinch_distance = None;
        }
        match self.pointers.as_slice() {
            [] => self.last_drag = None,
            // the finger left behind after a pinch continues as a drag
            [(_, pos)] => self.last_drag = Some(*pos),
            _ => {}
        }
    }

    pub fn touch_start(&mut self, touches: &[Vec2]) {
        match touches {
            [a, b, ..] => self.last_touch_distance = Some(a.distance(*b)),
            [t] => self.last_touch = Some(*t),
            [] => {}
        }
    }

    pub fn touch_move(&mut self, touches: &[Vec2], fov: f32) -> Option<CameraDelta> {
        match touches {
            [a, b, ..] => {
                let prev = self.last_touch_distance?;
                let d = a.distance(*b);
                self.last_touch_distance = Some(d);
                Some(pinch_delta(prev, d))
            }
            [t] => {
                let prev = self.last_touch?;
                self.last_touch = Some(*t);
                Some(drag_delta(*t - prev, fov))
            }
            [] => None,
        }
    }

    /// `remaining` is the list of contacts still down after the end/cancel.
    pub fn touch_end(&mut self, remaining: &[Vec2]) {
        if remaining.len() < 2 {
            self.last_touch_distance = None;
        }
        self.last_touch = match remaining {
            [t] => Some(*t),
            _ => None,
        };
    }
}
