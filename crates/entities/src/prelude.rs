pub use super::app_user::Entity as AppUser;
pub use super::region_code::Entity as RegionCode;
