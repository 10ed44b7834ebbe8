pub mod access;
pub mod constants;
pub mod jwt;
pub mod password;
pub mod utils;
