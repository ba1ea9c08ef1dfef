pub mod attr_stats;
pub mod extract;
pub mod summary;
pub mod table;
