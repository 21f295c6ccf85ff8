pub mod approval;
pub mod audit;
pub mod auth;
pub mod calculator;
pub mod catalog;
pub mod context;
pub mod input;
pub mod period;
pub mod reports;
pub mod submit;
pub mod users;
