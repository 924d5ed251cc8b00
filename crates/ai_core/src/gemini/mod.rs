//! Gemini-style generative language API adapter

mod client;
mod streaming;

pub use client::GeminiEngine;
