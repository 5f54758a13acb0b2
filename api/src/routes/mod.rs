pub mod chat;
pub mod clear_route;
pub mod home_route;
pub mod info_route;
pub mod search;
