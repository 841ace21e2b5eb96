pub mod controller;
pub mod store;

pub use controller::TabController;
pub use store::ResultStore;
