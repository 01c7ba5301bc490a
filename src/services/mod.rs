pub mod providers;
pub mod recommendations;

pub use providers::{GoogleBooksProvider, SearchProvider};
pub use recommendations::{Recommender, RecommenderSettings};
