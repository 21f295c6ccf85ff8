pub mod audit_log;
pub mod catalog;
pub mod initialize;
pub mod migrate;
pub mod pool;
pub mod stats;
pub mod timesheets;
pub mod users;
