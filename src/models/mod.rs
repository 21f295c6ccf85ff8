pub mod audit;
pub mod catalog;
pub mod role;
pub mod timesheet;
pub mod user;
