pub mod agent;
pub mod mission;
pub mod patch;

pub use agent::{Agent, NewAgent};
pub use mission::{Mission, MissionChanges, MissionPatch, MissionSummary, NewTarget, Target, MAX_TARGETS};
pub use patch::FieldPatch;
