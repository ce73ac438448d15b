//! The player-controlled point that the selected character puppet tracks.

use glam::Vec2;

/// Movement speed in pixels per millisecond.
pub const PLAYER_SPEED: f32 = 0.06;

/// Velocity in polar form: a magnitude and a direction. Rewritten from
/// the keyboard snapshot once per tick; the entity itself never decays
/// it, so a caller that stops steering must zero the speed explicitly.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolarVel {
    pub speed: f32,
    pub angle_rad: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct Player {
    pub pos: Vec2,
    pub vel: PolarVel,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: PolarVel::default(),
        }
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.vel.speed = speed;
    }

    pub fn set_angle(&mut self, angle_rad: f32) {
        self.vel.angle_rad = angle_rad;
    }

    /// Advance by the elapsed milliseconds along the current velocity.
    pub fn update(&mut self, dt_ms: u64) {
        let step = self.vel.speed * dt_ms as f32;
        self.pos += Vec2::new(
            step * self.vel.angle_rad.cos(),
            step * self.vel.angle_rad.sin(),
        );
    }
}
