use crate::error::PersistDbError;
use crate::persist::{NewUser, PersistCtx};
use entities::app_user;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};

use super::common::{is_unique_violation, new_uuid, now};

pub async fn insert_user(
    ctx: &PersistCtx,
    user: NewUser,
) -> Result<app_user::Model, PersistDbError> {
    let email = user.email.clone();
    let model = app_user::ActiveModel {
        id: Set(new_uuid()),
        email: Set(user.email),
        password_hash: Set(user.password_hash),
        role: Set(user.role),
        couple_id: Set(user.couple_id),
        created_at: Set(now()),
    };

    app_user::Entity::insert(model)
        .exec_with_returning(ctx.db.as_ref())
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                PersistDbError::DuplicateUser(email)
            } else {
                PersistDbError::DatabaseFailure(err)
            }
        })
}

pub async fn find_user_by_email(
    ctx: &PersistCtx,
    email: &str,
) -> Result<Option<app_user::Model>, PersistDbError> {
    let row = app_user::Entity::find()
        .filter(app_user::Column::Email.eq(email))
        .one(ctx.db.as_ref())
        .await?;
    Ok(row)
}

pub async fn get_user(ctx: &PersistCtx, user_id: &str) -> Result<app_user::Model, PersistDbError> {
    app_user::Entity::find_by_id(user_id)
        .one(ctx.db.as_ref())
        .await?
        .ok_or_else(|| PersistDbError::UserNotFound(user_id.to_string()))
}
