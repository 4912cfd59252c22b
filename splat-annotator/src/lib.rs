pub mod engine;
pub mod io;
pub mod markers;
pub mod tools;
