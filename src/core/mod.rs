//! Core factory handle types.

mod builder;
mod delegate;
mod factory_handle;
mod proxy;

pub use builder::FactoryBuilder;
pub use delegate::DelegateBuilder;
pub use factory_handle::HotswapFactory;
pub use proxy::FactoryProxy;
