pub mod catalog;
pub mod mail;
pub mod system;
