//! Targets, projectiles and score
//!
//! Consumes shot events: each shot becomes a projectile that flies straight
//! along the aim direction, one step per render tick. Hit targets respawn
//! after a delay; pending respawns are plain deadlines checked on tick, so
//! stopping the session just drops them.

use nalgebra::Vector3;

use crate::config::ArenaConfig;
use crate::tracking::ShotEvent;

/// Random source in [0, 1)
pub type RandomSource<'a> = &'a mut dyn FnMut() -> f32;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Target {
    pub id: u32,
    pub position: Vector3<f32>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projectile {
    pub origin: Vector3<f32>,
    pub position: Vector3<f32>,
    pub velocity: Vector3<f32>,
}

/// Result of advancing the arena one tick
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ArenaStep {
    /// Ids of targets destroyed this tick
    pub hits: Vec<u32>,
    pub respawned: usize,
}

#[derive(Clone, Debug)]
pub struct Arena {
    config: ArenaConfig,
    targets: Vec<Target>,
    projectiles: Vec<Projectile>,
    /// Due times (seconds) of scheduled respawns
    pending_respawns: Vec<f64>,
    score: u32,
    next_id: u32,
}

impl Arena {
    pub fn new(config: ArenaConfig) -> Self {
        Self {
            config,
            targets: Vec::new(),
            projectiles: Vec::new(),
            pending_respawns: Vec::new(),
            score: 0,
            next_id: 0,
        }
    }

    /// Clear everything and place the initial targets
    pub fn populate(&mut self, random: RandomSource) {
        self.clear();
        self.score = 0;
        for _ in 0..self.config.target_count {
            self.spawn_target(&mut *random);
        }
    }

    /// Random point on a ring around the room centre
    pub fn spawn_target(&mut self, random: RandomSource) -> Target {
        let angle = random() * std::f32::consts::TAU;
        let distance = self.config.min_distance + random() * self.config.distance_spread;
        let height = self.config.min_height + random() * self.config.height_spread;

        let target = Target {
            id: self.next_id,
            position: Vector3::new(angle.sin() * distance, height, angle.cos() * distance),
        };
        self.next_id = self.next_id.wrapping_add(1);
        self.targets.push(target);
        target
    }

    pub fn fire(&mut self, shot: &ShotEvent) {
        self.projectiles.push(Projectile {
            origin: shot.origin,
            position: shot.origin,
            velocity: shot.direction.into_inner() * self.config.projectile_speed,
        });
    }

    /// Advance projectiles one step, resolve hits, run due respawns
    pub fn tick(&mut self, now: f64, random: RandomSource) -> ArenaStep {
        let mut step = ArenaStep::default();
        let hit_radius = self.config.hit_radius;
        let range = self.config.projectile_range;

        let mut surviving = Vec::with_capacity(self.projectiles.len());
        for mut projectile in self.projectiles.drain(..) {
            projectile.position += projectile.velocity;

            let hit = self
                .targets
                .iter()
                .position(|t| (projectile.position - t.position).norm() < hit_radius);
            if let Some(idx) = hit {
                let target = self.targets.remove(idx);
                self.score += self.config.hit_score;
                self.pending_respawns.push(now + self.config.respawn_seconds);
                step.hits.push(target.id);
                log::info!("🎯 target {} hit, score {}", target.id, self.score);
                continue;
            }

            if (projectile.position - projectile.origin).norm() > range {
                continue;
            }
            surviving.push(projectile);
        }
        self.projectiles = surviving;

        let due = self.pending_respawns.iter().filter(|&&t| t <= now).count();
        self.pending_respawns.retain(|&t| t > now);
        for _ in 0..due {
            self.spawn_target(&mut *random);
        }
        step.respawned = due;

        step
    }

    /// Drop projectiles and pending respawns (targets stay for display)
    pub fn cancel_pending(&mut self) {
        self.projectiles.clear();
        self.pending_respawns.clear();
    }

    pub fn clear(&mut self) {
        self.targets.clear();
        self.cancel_pending();
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn pending_respawns(&self) -> usize {
        self.pending_respawns.len()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn set_config(&mut self, config: ArenaConfig) {
        self.config = config;
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(ArenaConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::Handedness;
    use nalgebra::Unit;

    fn fixed(value: f32) -> impl FnMut() -> f32 {
        move || value
    }

    fn shot_at(origin: Vector3<f32>, direction: Vector3<f32>) -> ShotEvent {
        ShotEvent {
            hand: Handedness::Right,
            origin,
            direction: Unit::new_normalize(direction),
            time: 0.0,
        }
    }

    #[test]
    fn test_populate_places_targets_on_ring() {
        let mut arena = Arena::default();
        arena.populate(&mut fixed(0.0));
        assert_eq!(arena.targets().len(), 5);
        // angle 0, distance 5, height 1
        let p = arena.targets()[0].position;
        assert!((p - Vector3::new(0.0, 1.0, 5.0)).norm() < 1e-5);
    }

    #[test]
    fn test_projectile_hits_target_and_scores() {
        let mut arena = Arena::default();
        arena.populate(&mut fixed(0.0));
        let mut random = fixed(0.5);

        arena.fire(&shot_at(Vector3::new(0.0, 1.0, 0.5), Vector3::z()));
        let mut hits = Vec::new();
        for i in 0..5 {
            hits.extend(arena.tick(i as f64 * 0.016, &mut random).hits);
        }
        // all five targets share a position; one projectile takes exactly one
        assert_eq!(hits.len(), 1);
        assert_eq!(arena.score(), 100);
        assert_eq!(arena.targets().len(), 4);
        assert!(arena.projectiles().is_empty());
        assert_eq!(arena.pending_respawns(), 1);
    }

    #[test]
    fn test_respawn_after_delay() {
        let mut arena = Arena::default();
        arena.populate(&mut fixed(0.0));
        let mut random = fixed(0.5);

        arena.fire(&shot_at(Vector3::new(0.0, 1.0, 3.8), Vector3::z()));
        arena.tick(10.0, &mut random);
        assert_eq!(arena.targets().len(), 4);

        assert_eq!(arena.tick(10.5, &mut random).respawned, 0);
        assert_eq!(arena.tick(11.0, &mut random).respawned, 1);
        assert_eq!(arena.targets().len(), 5);
        assert_eq!(arena.pending_respawns(), 0);
    }

    #[test]
    fn test_projectile_expires_out_of_range() {
        let mut arena = Arena::default();
        arena.fire(&shot_at(Vector3::zeros(), Vector3::y()));
        let mut random = fixed(0.0);
        for i in 0..13 {
            arena.tick(i as f64, &mut random);
        }
        // 13 * 1.5 = 19.5, still in range
        assert_eq!(arena.projectiles().len(), 1);
        arena.tick(14.0, &mut random);
        assert!(arena.projectiles().is_empty());
    }

    #[test]
    fn test_cancel_drops_pending_respawns() {
        let mut arena = Arena::default();
        arena.populate(&mut fixed(0.0));
        let mut random = fixed(0.0);
        arena.fire(&shot_at(Vector3::new(0.0, 1.0, 3.8), Vector3::z()));
        arena.tick(0.0, &mut random);
        assert_eq!(arena.pending_respawns(), 1);

        arena.cancel_pending();
        assert_eq!(arena.tick(5.0, &mut random).respawned, 0);
        assert_eq!(arena.targets().len(), 4);
    }
}
