pub mod base;
pub mod newsapi;
pub mod openai;
pub mod sentiment;
pub mod yahoo;
