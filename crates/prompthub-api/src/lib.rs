pub mod admob;
pub mod ads;
pub mod auth;
pub mod categories;
pub mod error;
pub mod favourites;
pub mod likes;
pub mod middleware;
pub mod prompts;
