use common::{
    context::Context,
    default_timestamp,
    entities::{
        category::Category,
        role::Role,
        user::{PublicUser, User},
    },
    error::{self, AddCode},
};
use lazy_static::lazy_static;
use mongodb::bson::{oid::ObjectId, Bson};
use rand::{distributions::Alphanumeric, Rng};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

lazy_static! {
    static ref EMAIL: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub category: Option<Category>,
}

pub fn new_salt() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(10)
        .map(char::from)
        .collect()
}

pub fn hash_password(password: &str, salt: &str) -> String {
    let mut salted = password.to_string();
    salted.push_str(salt);
    sha256::digest(salted)
}

pub struct UserService {
    pub context: Context,
}

impl UserService {
    pub fn new(context: Context) -> Self {
        Self { context }
    }

    fn validate(user: &CreateUser) -> error::Result<()> {
        if user.name.trim().is_empty() {
            return Err(anyhow::anyhow!("Name is required").code(400));
        }
        if !EMAIL.is_match(user.email.trim()) {
            return Err(anyhow::anyhow!("Invalid email: {}", user.email).code(400));
        }
        if user.password.is_empty() {
            return Err(anyhow::anyhow!("Password is required").code(400));
        }
        if user.role == Role::Team && user.category.is_none() {
            return Err(anyhow::anyhow!("Category is required for team members").code(400));
        }
        Ok(())
    }

    /// Validates and stores a new account. Category is only kept for team
    /// accounts.
    pub async fn create(&self, user: CreateUser) -> error::Result<User> {
        Self::validate(&user)?;

        let users = self.context.try_get_repository::<User>()?;
        let email = user.email.trim().to_lowercase();

        if users.find("email", &Bson::String(email.clone())).await?.is_some() {
            return Err(anyhow::anyhow!("User already exists").code(400));
        }

        let salt = new_salt();
        let now = default_timestamp();
        let user = User {
            id: ObjectId::new(),
            name: user.name.trim().to_string(),
            email,
            password: hash_password(&user.password, &salt),
            salt,
            role: user.role,
            category: match user.role {
                Role::Team => user.category,
                Role::Client | Role::Admin => None,
            },
            created_at: now,
            last_modified: now,
        };

        if !users.insert(&user).await? {
            return Err(anyhow::anyhow!("User already exists").code(400));
        }

        log::info!("Registered {} user {}", user.role, user.id);
        Ok(user)
    }

    pub async fn profile(&self) -> error::Result<PublicUser> {
        let id = self.context.auth().authenticated()?;
        let users = self.context.try_get_repository::<User>()?;

        let Some(user) = users.find("id", &Bson::ObjectId(id)).await? else {
            return Err(anyhow::anyhow!("User not found").code(404));
        };

        Ok(user.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_depends_on_salt() {
        let first = hash_password("secret", "aaaa");
        assert_eq!(first, hash_password("secret", "aaaa"));
        assert_ne!(first, hash_password("secret", "bbbb"));
        assert_ne!(first, "secret");
        assert_eq!(new_salt().len(), 10);
    }

    #[test]
    fn team_without_category_is_invalid() {
        let user = CreateUser {
            name: "Tess".to_string(),
            email: "tess@example.com".to_string(),
            password: "secret".to_string(),
            role: Role::Team,
            category: None,
        };
        assert_eq!(UserService::validate(&user).unwrap_err().code, 400);

        let user = CreateUser {
            category: Some(Category::Supplies),
            ..user
        };
        assert!(UserService::validate(&user).is_ok());
    }

    #[test]
    fn malformed_email_is_invalid() {
        let user = CreateUser {
            name: "Cal".to_string(),
            email: "cal-at-example".to_string(),
            password: "secret".to_string(),
            role: Role::Client,
            category: None,
        };
        assert_eq!(UserService::validate(&user).unwrap_err().code, 400);
    }
}
