pub mod escape;
pub mod get_client_ip;
