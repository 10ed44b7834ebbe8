pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLES_ALLOWED: [&str; 2] = [ROLE_USER, ROLE_ADMIN];

pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const TOKEN_TYPE_REFRESH: &str = "refresh";

pub const BEARER_PREFIX: &str = "Bearer ";
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

pub const MIN_PASSWORD_LEN: usize = 8;
