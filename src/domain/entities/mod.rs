pub mod contact_me;
pub mod notification;
