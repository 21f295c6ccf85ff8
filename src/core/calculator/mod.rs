pub mod hours;
pub mod totals;
