use crate::persist::RegionCode;
use crate::service::auth::UserProfile;
use entities::{app_user, region_code};

pub fn region_model_to_record(row: region_code::Model) -> RegionCode {
    RegionCode {
        main_code: row.main_code,
        sub_code: row.sub_code,
        name: row.name,
    }
}

pub fn user_model_to_profile(row: app_user::Model) -> UserProfile {
    UserProfile {
        id: row.id,
        email: row.email,
        role: row.role,
        couple_id: row.couple_id,
        created_at: row.created_at.and_utc().to_rfc3339(),
    }
}
