pub mod adapters;
pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod persistence;
pub mod services;

pub use config::AppConfig;
pub use domain::{Agent, Mission, MissionPatch, NewAgent, NewTarget, Target};
pub use error::{AgencyError, Result};
pub use services::{AgentDirectory, BreedValidator, MissionEngine};
