pub mod issue;
pub mod report;
pub mod transition;

use common::{
    auth::Auth,
    context::Context,
    entities::{role::Role, user::User},
    error::{self, AddCode},
};
use mongodb::bson::Bson;

/// Loads the caller as a team member. A missing session, another role, or a
/// token whose account was deleted or demoted all get 401.
pub async fn team_member(context: &Context) -> error::Result<User> {
    let Auth::Team(id) = context.auth() else {
        return Err(anyhow::anyhow!("Not authorized as a team member").code(401));
    };

    let users = context.try_get_repository::<User>()?;
    match users.find("id", &Bson::ObjectId(id)).await? {
        Some(user) if user.role == Role::Team && user.category.is_some() => Ok(user),
        _ => Err(anyhow::anyhow!("Not authorized as a team member").code(401)),
    }
}
