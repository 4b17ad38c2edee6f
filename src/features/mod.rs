pub mod ai;
pub mod categories;
pub mod complaints;
pub mod health;
pub mod users;
