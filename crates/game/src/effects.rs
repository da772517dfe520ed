//! Tick-driven visual effects requested by the simulation (explosions).
//!
//! The core never draws anything. It allocates a handle, tells the effect
//! sink where to play the effect, advances one frame per logic tick and
//! reports completion once the last frame has been shown.

use glam::DVec2;

/// Core-allocated identifier for a running effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EffectHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    Explosion,
}

/// Sent to the effect sink when an effect starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectRequest {
    pub handle: EffectHandle,
    pub kind: EffectKind,
    pub position: DVec2,
}

/// A sprite-sheet explosion: one frame per tick, finished one tick after the last frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Explosion {
    pub handle: EffectHandle,
    pub position: DVec2,
    /// Frame currently shown; 0 until the first advance.
    pub frame: u32,
    pub frame_count: u32,
}

impl Explosion {
    pub fn new(handle: EffectHandle, position: DVec2, frame_count: u32) -> Self {
        Self { handle, position, frame: 0, frame_count }
    }

    /// Advance one tick. Returns true once the animation is over.
    pub fn advance(&mut self) -> bool {
        if self.frame >= self.frame_count {
            return true;
        }
        self.frame += 1;
        false
    }

    pub fn is_last_frame(&self) -> bool {
        self.frame >= self.frame_count
    }
}

/// Running effects owned by the session.
#[derive(Debug, Default)]
pub struct EffectQueue {
    next_handle: u64,
    explosions: Vec<Explosion>,
}

impl EffectQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an explosion at `position` and return the request for the sink.
    pub fn spawn_explosion(&mut self, position: DVec2, frame_count: u32) -> EffectRequest {
        self.next_handle += 1;
        let handle = EffectHandle(self.next_handle);
        self.explosions.push(Explosion::new(handle, position, frame_count));
        log::debug!("Explosion {:?} started at ({:.1}, {:.1})", handle, position.x, position.y);
        EffectRequest { handle, kind: EffectKind::Explosion, position }
    }

    /// Advance every effect by one tick; returns the handles that finished.
    pub fn update(&mut self) -> Vec<EffectHandle> {
        let mut finished = Vec::new();
        self.explosions.retain_mut(|e| {
            if e.advance() {
                finished.push(e.handle);
                false
            } else {
                true
            }
        });
        finished
    }

    pub fn active(&self) -> &[Explosion] {
        &self.explosions
    }

    pub fn is_empty(&self) -> bool {
        self.explosions.is_empty()
    }

    /// Drop running effects. Handles are never reused.
    pub fn clear(&mut self) {
        self.explosions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explosion_runs_all_frames_then_finishes() {
        let mut queue = EffectQueue::new();
        let req = queue.spawn_explosion(DVec2::new(3.0, 4.0), 25);
        assert_eq!(req.kind, EffectKind::Explosion);
        for frame in 1..=25 {
            assert!(queue.update().is_empty());
            assert_eq!(queue.active()[0].frame, frame);
        }
        assert!(queue.active()[0].is_last_frame());
        assert_eq!(queue.update(), vec![req.handle]);
        assert!(queue.is_empty());
    }

    #[test]
    fn handles_are_unique_across_clear() {
        let mut queue = EffectQueue::new();
        let a = queue.spawn_explosion(DVec2::ZERO, 1).handle;
        queue.clear();
        let b = queue.spawn_explosion(DVec2::ZERO, 1).handle;
        assert_ne!(a, b);
    }

    #[test]
    fn zero_frame_effect_finishes_next_tick() {
        let mut queue = EffectQueue::new();
        let req = queue.spawn_explosion(DVec2::ZERO, 0);
        assert_eq!(queue.update(), vec![req.handle]);
    }
}
