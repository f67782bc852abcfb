pub mod brands;
pub mod products;
pub mod transaction_detail;
pub mod transactions;
pub mod users;

pub use brands::Entity as Brands;
pub use products::Entity as Products;
pub use transaction_detail::Entity as TransactionDetail;
pub use transactions::Entity as Transactions;
pub use users::Entity as Users;
