pub mod attrs;
pub mod engine;
pub mod io;
pub mod model;
pub mod scan;
pub mod tally;
