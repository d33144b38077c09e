//! Drivers that feed input into a match and present its frames

pub mod headless;
pub mod window;
