pub mod event;
pub mod ring_buffer;
pub mod stats;
pub mod window;
