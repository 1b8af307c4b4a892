//! Sample entities: users and products carrying embedded reviews.

mod product;
mod user;

pub use product::{Product, Review};
pub use user::User;
