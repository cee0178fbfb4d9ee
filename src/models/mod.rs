pub mod claim;
pub mod employee;
pub mod outcome;
pub mod summary;
