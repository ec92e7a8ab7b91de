pub mod agent_directory;
pub mod mission_engine;

pub use agent_directory::{AgentDirectory, BreedValidator};
pub use mission_engine::MissionEngine;
