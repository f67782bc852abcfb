pub mod brands;
pub mod orders;
pub mod products;
