//! Captcha hell
//!
//! Absurd challenges ([`challenge`]), the attempt-limited session that
//! serves them ([`session`]) and the page of locked paragraphs they guard
//! ([`gate`]).

pub mod challenge;
pub mod gate;
pub mod session;

pub use challenge::{Answer, CaptchaKind, Challenge, Color};
pub use gate::{CaptchaGate, DEFAULT_PARAGRAPHS, GateEvent, GateStats};
pub use session::{CaptchaEvent, CaptchaSession, FailReason, countdown_secs};
