//! iXiA assistant core.
//!
//! Routes each chat message to one of three reply engines: an arithmetic
//! evaluator, a creative prompt kit, or a hosted text-generation model with
//! a keyword-matching fallback when the model cannot be reached.

pub mod application;
pub mod domain;
pub mod infrastructure;
