pub mod gestures;
pub mod listing;
pub mod viewer;
