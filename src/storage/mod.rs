pub mod catalog;
pub mod executor;
pub mod pool;

pub use catalog::introspect;
pub use executor::{execute, limited_sql};
pub use pool::{connect_pool, connect_pool_lazy};
