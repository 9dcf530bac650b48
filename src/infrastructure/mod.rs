pub mod config;
pub mod remote_clients;
pub mod security;
pub mod spreadsheet;
