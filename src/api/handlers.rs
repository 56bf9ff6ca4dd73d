pub mod portfolio;
pub mod position;
pub mod system;
pub mod user;
