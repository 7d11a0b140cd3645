//! Combat and decay authorization.
//!
//! Every hit is classified against a priority-ordered table (first match
//! wins). The same table gates trap triggering and turret targeting. Decay
//! damage skips the table and is reduced by land type instead.

mod classifier;
mod engine;

pub use classifier::is_protected;
pub use engine::{Combatant, CombatAuthorizer, Decision, StructureTarget, Target};
