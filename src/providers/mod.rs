//! Upstream inference service clients
//!
//! Thin request functions over the REST surface of the multimodal
//! inference service. No business logic lives here; callers own the
//! prompts and the interpretation of replies.

pub mod gemini;
