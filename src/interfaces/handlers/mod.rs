pub mod contact_me;
pub mod system;
