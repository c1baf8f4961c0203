mod client;
pub mod wire;

pub use client::{GeminiClient, GEMINI_API_BASE};
