pub mod config;
pub mod constants;
pub mod curve;
pub mod error;
pub mod participant;
pub mod reward;
pub mod types;

pub use config::*;
pub use constants::*;
pub use curve::tetrahedral_position;
pub use error::VouchError;
pub use participant::*;
pub use reward::reward_amount;
pub use types::*;
