//! In-process cache stores

pub mod memory;

pub use memory::InMemoryCalendarCache;
