pub mod net;
pub mod shell;
pub mod utils;
pub mod volume;
