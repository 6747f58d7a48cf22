use common::{
    access_rules::{deny, AccessRules, Administrate},
    context::Context,
    entities::{
        category::Category,
        role::Role,
        user::{PublicUser, User},
    },
    error::{self, AddCode},
};
use mongodb::bson::{oid::ObjectId, Bson};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::user::{CreateUser, UserService};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateTeamMember {
    pub name: String,
    pub email: String,
    pub password: String,
    pub category: Category,
}

pub struct TeamService {
    context: Context,
}

impl TeamService {
    pub fn new(context: Context) -> Self {
        Self { context }
    }

    fn check_admin(&self) -> error::Result<()> {
        let auth = self.context.auth();
        if !Administrate.get_access(&auth, ()) {
            return Err(deny(&auth, "Not authorized as an admin"));
        }
        Ok(())
    }

    pub async fn list(&self) -> error::Result<Vec<PublicUser>> {
        self.check_admin()?;
        let users = self.context.try_get_repository::<User>()?;

        let members = users.find_many("role", &Bson::String(Role::Team.to_string())).await?;
        Ok(members.into_iter().map(PublicUser::from).collect())
    }

    pub async fn create(&self, member: CreateTeamMember) -> error::Result<PublicUser> {
        self.check_admin()?;

        let user = UserService::new(self.context.clone())
            .create(CreateUser {
                name: member.name,
                email: member.email,
                password: member.password,
                role: Role::Team,
                category: Some(member.category),
            })
            .await?;

        Ok(user.into())
    }

    pub async fn delete(&self, id: ObjectId) -> error::Result<PublicUser> {
        self.check_admin()?;
        let users = self.context.try_get_repository::<User>()?;

        let member = users.find("id", &Bson::ObjectId(id)).await?;
        if !matches!(&member, Some(user) if user.role == Role::Team) {
            return Err(anyhow::anyhow!("Team member not found").code(404));
        }

        let Some(member) = users.delete("id", &id).await? else {
            return Err(anyhow::anyhow!("Team member not found").code(404));
        };

        log::info!("Removed team member {}", member.id);
        Ok(member.into())
    }
}
