pub mod reveal;
pub mod scanner;
pub mod throttle;
