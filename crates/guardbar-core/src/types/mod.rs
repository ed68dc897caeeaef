mod connection;
mod icon;
mod preset;
mod stats;
mod status;
mod timer;

pub use connection::*;
pub use icon::*;
pub use preset::*;
pub use stats::*;
pub use status::*;
pub use timer::*;
