pub mod db;

pub use db::{ReferralStore, TransferRecord};
