pub mod aggregate;
pub mod loader;
pub mod pricing;
