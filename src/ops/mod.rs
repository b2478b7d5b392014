pub mod form;
pub mod stats;
pub mod store;
pub mod visible;
