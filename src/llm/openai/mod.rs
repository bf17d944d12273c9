pub mod openai;
pub mod structs;
