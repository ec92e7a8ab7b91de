pub mod agents;
pub mod missions;
pub mod system;

pub use agents::*;
pub use missions::*;
pub use system::*;
