pub mod config;
pub mod curve;
pub mod fling;
pub mod scroll;
pub mod spring_back;
