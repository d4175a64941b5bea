pub mod memory;

pub use memory::MemoryPortfolioStore;
