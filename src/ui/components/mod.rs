//! Reusable UI components for the looper.

pub mod clip_bars;
pub mod clip_list;
pub mod transport_bar;

pub use clip_bars::ClipBars;
pub use clip_list::ClipList;
pub use transport_bar::TransportBar;
