//! Foundation module - Core utilities shared by the audio and piano modules
//!
//! Currently only logging setup lives here.

pub mod logging;
