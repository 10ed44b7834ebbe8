pub mod prelude;

pub mod app_user;
pub mod region_code;
