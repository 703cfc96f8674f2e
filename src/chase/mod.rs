//! Cursor chase
//!
//! Targets flee the pointer, split when cornered and are caught by a click.
//! Everything here is host-agnostic: positions are container-relative and
//! time arrives as elapsed milliseconds.

pub mod arena;
pub mod evasion;
pub mod fleeing;
pub mod target;

pub use arena::{ChaseArena, ChaseEvent, ChaseStats};
pub use evasion::{Evasion, can_split, escape_distance, evade, is_cornered, split_positions};
pub use fleeing::FleeingButton;
pub use target::{EvasiveTarget, SizeClass, TAUNTS, TargetId, TargetPhase};
