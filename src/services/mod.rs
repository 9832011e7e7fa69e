pub mod formatter;
pub mod risk;

pub use formatter::PoolCardFormatter;
