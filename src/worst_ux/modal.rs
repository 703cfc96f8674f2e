//! Modal hydra
//!
//! Closing a modal spawns two more, unless it is the last one standing.
//! Clicking the backdrop spawns two as well, and the close button dodges
//! the pointer.

use glam::Vec2;
use serde::Serialize;

use crate::random::RandomSource;

/// Modal identity, unique while the hydra is open
pub type ModalId = u32;

/// Close button jitter on hover, sampled in [-JITTER, JITTER) per axis
pub const CLOSE_JITTER: f32 = 10.0;
/// Stacked modals fan out in rows of this many
pub const STACK_COLUMNS: usize = 3;
pub const STACK_STEP: Vec2 = Vec2::new(50.0, 30.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ModalEvent {
    /// Two new heads appeared
    Spawned([ModalId; 2]),
    /// The last modal was closed; the hydra is gone
    Dismissed,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModalHydra {
    modals: Vec<ModalId>,
    next_id: ModalId,
    /// Current offset of the close button from its resting spot
    pub close_offset: Vec2,
    /// Modals ever spawned, the first one included
    pub spawned: u32,
}

impl Default for ModalHydra {
    fn default() -> Self {
        Self {
            modals: Vec::new(),
            next_id: 1,
            close_offset: Vec2::ZERO,
            spawned: 0,
        }
    }
}

impl ModalHydra {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        !self.modals.is_empty()
    }

    /// Open modals, bottom of the stack first
    pub fn modals(&self) -> &[ModalId] {
        &self.modals
    }

    /// Show the first notice; no-op while already open
    pub fn open(&mut self) {
        if self.is_open() {
            return;
        }
        self.close_offset = Vec2::ZERO;
        let id = self.next();
        self.modals.push(id);
        log::info!("Modal hydra opened");
    }

    /// Close button of modal `id` was clicked
    pub fn close(&mut self, id: ModalId) -> Option<ModalEvent> {
        let idx = self.modals.iter().position(|m| *m == id)?;
        if self.modals.len() == 1 {
            self.modals.clear();
            log::info!("Modal hydra dismissed after {} modals", self.spawned);
            return Some(ModalEvent::Dismissed);
        }
        self.modals.remove(idx);
        Some(self.grow())
    }

    /// The backdrop behind the modals was clicked
    pub fn background_click(&mut self) -> Option<ModalEvent> {
        self.is_open().then(|| self.grow())
    }

    /// Pointer reached a close button; it jumps somewhere nearby
    pub fn hover_close<R: RandomSource>(&mut self, rng: &mut R) {
        let x = rng.range(-CLOSE_JITTER, CLOSE_JITTER);
        let y = rng.range(-CLOSE_JITTER, CLOSE_JITTER);
        self.close_offset = Vec2::new(x, y);
    }

    /// Offset of the modal at stack position `index` from the centre
    pub fn layout(index: usize) -> Vec2 {
        let column = (index % STACK_COLUMNS) as f32 - 1.0;
        let row = (index / STACK_COLUMNS) as f32;
        Vec2::new(column, row) * STACK_STEP
    }

    fn grow(&mut self) -> ModalEvent {
        let heads = [self.next(), self.next()];
        self.modals.extend_from_slice(&heads);
        log::debug!("Modal hydra grew to {} heads", self.modals.len());
        ModalEvent::Spawned(heads)
    }

    fn next(&mut self) -> ModalId {
        let id = self.next_id;
        self.next_id += 1;
        self.spawned += 1;
        id
    }
}
