pub mod admin;
pub mod moderation;
pub mod system;
