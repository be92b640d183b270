pub mod drag;
pub mod export;
pub mod projector;
pub mod sensor;
pub mod store;
