mod fs;

pub use fs::write_atomic;
