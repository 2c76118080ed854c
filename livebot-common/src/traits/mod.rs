pub mod api;
pub mod repository_traits;
