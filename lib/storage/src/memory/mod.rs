mod dataset;

pub use dataset::MemoryDataset;
