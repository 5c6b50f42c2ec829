pub mod gemini;
pub mod http;
pub mod openai;
pub mod weather;
