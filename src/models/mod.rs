pub mod address;
pub mod claim;
pub mod outcome;
pub mod session;
