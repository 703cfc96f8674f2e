//! Cursor chase arena
//!
//! Owns the authoritative set of active targets and is its only writer.
//! Targets are kept sorted by id so every pointer event is evaluated in a
//! stable order.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::evasion::{Evasion, evade, random_spawn, split_positions};
use super::target::{CAUGHT_TAUNT, EvasiveTarget, SizeClass, TargetId};
use crate::clamp_into;
use crate::consts::*;
use crate::random::{RandomSource, seeded};
use crate::settings::ChaseDifficulty;
use crate::timer::{Interval, Timeout};

/// Something the page should react to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChaseEvent {
    /// A target fled to a new position
    Evaded { id: TargetId, pos: Vec2 },
    /// A cornered target was replaced by two small ones
    Split {
        id: TargetId,
        at: Vec2,
        children: [TargetId; 2],
    },
    /// A target was clicked
    Caught { id: TargetId },
    /// A replacement target appeared after a catch
    Respawned { id: TargetId },
}

/// Running totals for the session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChaseStats {
    pub catches: u32,
    pub escapes: u32,
    pub splits: u32,
    pub elapsed_secs: u32,
}

/// The chase page: targets, stats, and the clocks that drive them
pub struct ChaseArena<R = Pcg32> {
    /// Container size; `None` until the host has measured it
    container: Option<Vec2>,
    difficulty: ChaseDifficulty,
    targets: Vec<EvasiveTarget>,
    stats: ChaseStats,
    next_id: TargetId,
    respawns: Vec<Timeout>,
    celebration: Timeout,
    elapsed_clock: Interval,
    escape_clock: Interval,
    rng: R,
}

impl ChaseArena<Pcg32> {
    /// Create an arena with a seeded generator
    pub fn new(seed: u64, difficulty: ChaseDifficulty) -> Self {
        Self::with_rng(seeded(seed), difficulty)
    }
}

impl<R: RandomSource> ChaseArena<R> {
    /// Create an arena drawing from the given random source
    pub fn with_rng(rng: R, difficulty: ChaseDifficulty) -> Self {
        let mut arena = Self {
            container: None,
            difficulty,
            targets: Vec::new(),
            stats: ChaseStats::default(),
            next_id: 1,
            respawns: Vec::new(),
            celebration: Timeout::default(),
            elapsed_clock: Interval::new(1000.0),
            escape_clock: Interval::new(2000.0),
            rng,
        };
        arena.spawn(Vec2::new(SPAWN_X, SPAWN_Y), SizeClass::Normal);
        arena
    }

    // === Lifecycle ===

    /// Start the session clocks
    pub fn start(&mut self) {
        self.elapsed_clock.start();
        self.escape_clock.start();
    }

    /// Stop every clock and drop pending respawns
    pub fn stop(&mut self) {
        self.elapsed_clock.stop();
        self.escape_clock.stop();
        self.respawns.clear();
        self.celebration.cancel();
    }

    pub fn is_running(&self) -> bool {
        self.elapsed_clock.is_running()
    }

    /// Back to one target at the spawn point, stats zeroed
    pub fn reset(&mut self) {
        self.targets.clear();
        self.respawns.clear();
        self.celebration.cancel();
        self.stats = ChaseStats::default();
        self.next_id = 1;
        self.spawn(Vec2::new(SPAWN_X, SPAWN_Y), SizeClass::Normal);
        log::info!("Chase arena reset");
    }

    // === Accessors ===

    pub fn targets(&self) -> &[EvasiveTarget] {
        &self.targets
    }

    pub fn target(&self, id: TargetId) -> Option<&EvasiveTarget> {
        self.targets.iter().find(|t| t.id == id)
    }

    pub fn stats(&self) -> ChaseStats {
        self.stats
    }

    pub fn difficulty(&self) -> ChaseDifficulty {
        self.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: ChaseDifficulty) {
        if self.difficulty != difficulty {
            log::info!("Chase difficulty: {}", difficulty.label());
        }
        self.difficulty = difficulty;
    }

    pub fn container(&self) -> Option<Vec2> {
        self.container
    }

    /// Record the measured container size
    ///
    /// Targets already on screen are pulled back inside the new bounds.
    pub fn set_container(&mut self, size: Vec2) {
        self.container = Some(size);
        for target in &mut self.targets {
            target.pos = clamp_into(target.pos, target.footprint(), size);
        }
    }

    pub fn is_celebrating(&self) -> bool {
        self.celebration.is_pending()
    }

    pub fn pending_respawns(&self) -> usize {
        self.respawns.len()
    }

    // === Input ===

    /// Pointer moved to a container-relative position
    pub fn pointer_moved(&mut self, pointer: Vec2) -> Vec<ChaseEvent> {
        let Some(container) = self.container else {
            return Vec::new();
        };
        let radius = self.difficulty.evasion_radius();

        let mut events = Vec::new();
        let mut splits = Vec::new();
        for target in &mut self.targets {
            match evade(target, pointer, container, radius, &mut self.rng) {
                Evasion::Stay => {}
                Evasion::Relocate { pos, .. } => {
                    target.flee_to(pos, &mut self.rng);
                    events.push(ChaseEvent::Evaded { id: target.id, pos });
                }
                Evasion::Split { at } => splits.push((target.id, at)),
            }
        }

        for (id, at) in splits {
            if let Some(event) = self.split(id, at, container) {
                events.push(event);
            }
        }
        events
    }

    /// Click at a container-relative point; catches the top-most target hit
    pub fn click(&mut self, point: Vec2) -> Option<ChaseEvent> {
        let id = self.hit_test(point)?;
        self.catch(id)
    }

    /// Top-most (most recently spawned) target under a point
    pub fn hit_test(&self, point: Vec2) -> Option<TargetId> {
        self.targets.iter().rev().find(|t| t.contains(point)).map(|t| t.id)
    }

    /// Catch a target by id
    ///
    /// Returns `None` when the target is already gone (caught or split), so a
    /// target is removed exactly once.
    pub fn catch(&mut self, id: TargetId) -> Option<ChaseEvent> {
        let mut target = self.remove(id)?;
        target.taunt = CAUGHT_TAUNT;
        self.stats.catches += 1;
        self.celebration.arm(CELEBRATION_MS);
        self.respawns.push(Timeout::armed(RESPAWN_DELAY_MS));
        log::debug!("Target {} caught after {} evasions", id, target.evasion_count);
        Some(ChaseEvent::Caught { id })
    }

    // === Time ===

    /// Advance clocks, shake timers and pending respawns
    pub fn tick(&mut self, dt_ms: f64) -> Vec<ChaseEvent> {
        let mut events = Vec::new();

        self.stats.elapsed_secs += self.elapsed_clock.advance(dt_ms);
        let escape_ticks = self.escape_clock.advance(dt_ms);
        if !self.targets.is_empty() {
            self.stats.escapes += escape_ticks;
        }

        for target in &mut self.targets {
            target.update(dt_ms);
        }
        self.celebration.advance(dt_ms);

        let due = self
            .respawns
            .iter_mut()
            .map(|t| t.advance(dt_ms))
            .filter(|fired| *fired)
            .count();
        self.respawns.retain(|t| t.is_pending());

        for _ in 0..due {
            // Respawns need a measured container; otherwise they are dropped
            let Some(container) = self.container else {
                continue;
            };
            let pos = random_spawn(SizeClass::Normal, container, &mut self.rng);
            let id = self.spawn(pos, SizeClass::Normal);
            events.push(ChaseEvent::Respawned { id });
        }

        events
    }

    // === Internals ===

    fn spawn(&mut self, pos: Vec2, size: SizeClass) -> TargetId {
        let id = self.next_id;
        self.next_id += 1;
        self.targets.push(EvasiveTarget::new(id, pos, size));
        id
    }

    fn remove(&mut self, id: TargetId) -> Option<EvasiveTarget> {
        let idx = self.targets.iter().position(|t| t.id == id)?;
        Some(self.targets.remove(idx))
    }

    fn split(&mut self, id: TargetId, at: Vec2, container: Vec2) -> Option<ChaseEvent> {
        self.remove(id)?;
        self.stats.splits += 1;
        let [left, right] = split_positions(at, container);
        let children = [
            self.spawn(left, SizeClass::Small),
            self.spawn(right, SizeClass::Small),
        ];
        Some(ChaseEvent::Split { id, at, children })
    }
}
