//! Core library components.

pub mod constants;
pub mod distro;
pub mod gpg;
pub mod locale;
pub mod pass;
pub mod pkg;
pub mod runner;
pub mod step;
