pub mod dashboard;
pub mod news;
pub mod stock;
