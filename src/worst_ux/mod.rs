//! Worst UX gallery
//!
//! Page furniture that fights the visitor: a scroll container that
//! hijacks the wheel ([`ScrollHijacker`]) and a stack of modals that
//! grows two heads for every one closed ([`ModalHydra`]). The fleeing
//! submit button lives with the chase widgets in
//! [`crate::chase::FleeingButton`].

pub mod modal;
pub mod scroll;

pub use modal::{ModalEvent, ModalHydra, ModalId};
pub use scroll::{ScrollEvent, ScrollHijacker};
