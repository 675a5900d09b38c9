pub mod dashboard;
pub mod projection;
