pub mod pricing;
pub mod store;

pub use pricing::CartPricer;
pub use store::{format_date, prescribed_quantity, StoreService};
