// local-tts - send selected text to a local TTS server
// Library exports

pub mod cli; // Host adapter and command plumbing
pub mod client; // HTTP client for the TTS server
pub mod config;
pub mod errors;
pub mod reporter;
