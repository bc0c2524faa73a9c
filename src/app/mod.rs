pub mod preview;
pub mod setup;

pub use preview::draw_preview;
pub use setup::{setup, watch_content};
