//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod collection;
pub mod collection_product;
pub mod order;
pub mod ordered_product;
pub mod product;
pub mod review;
pub mod user;

// Re-export specific types to avoid conflicts
pub use collection::{Column as CollectionColumn, Entity as Collection, Model as CollectionModel};
pub use collection_product::{
    Column as CollectionProductColumn, Entity as CollectionProduct,
    Model as CollectionProductModel,
};
pub use order::{Column as OrderColumn, Entity as Order, Model as OrderModel, OrderStatus};
pub use ordered_product::{
    Column as OrderedProductColumn, Entity as OrderedProduct, Model as OrderedProductModel,
};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use review::{Column as ReviewColumn, Entity as Review, Model as ReviewModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
