pub mod extended;
pub mod tick;
pub mod window;
