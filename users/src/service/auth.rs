use common::{
    auth::Auth,
    context::Context,
    entities::user::{PublicUser, User},
    error::{self, AddCode},
};
use mongodb::bson::Bson;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::user::{hash_password, CreateUser, UserService};

pub struct AuthService {
    context: Context,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Login {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Token {
    pub token: String,
    pub user: PublicUser,
}

impl Token {
    fn issue(user: User) -> error::Result<Self> {
        let token = Auth::from(&user).to_token()?;
        Ok(Token {
            token,
            user: user.into(),
        })
    }
}

impl AuthService {
    pub fn new(context: Context) -> Self {
        Self { context }
    }

    fn request_access(auth_password: &str, correct_password: &str, salt: &str) -> bool {
        hash_password(auth_password, salt) == correct_password
    }

    pub async fn register(&self, user: CreateUser) -> error::Result<Token> {
        let user = UserService::new(self.context.clone()).create(user).await?;
        Token::issue(user)
    }

    pub async fn login(&self, login: &Login) -> error::Result<Token> {
        let users = self.context.try_get_repository::<User>()?;
        let email = login.email.trim().to_lowercase();

        let Some(user) = users.find("email", &Bson::String(email)).await? else {
            return Err(anyhow::anyhow!("Invalid credentials").code(401));
        };

        if !Self::request_access(&login.password, &user.password, &user.salt) {
            log::info!("Rejected login for user {}", user.id);
            return Err(anyhow::anyhow!("Invalid credentials").code(401));
        }

        Token::issue(user)
    }
}
