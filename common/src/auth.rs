use chrono::Utc;
use jsonwebtoken::{
    decode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use mongodb::bson::oid::ObjectId;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::{
    constants::DURATION,
    entities::{role::Role, user::User},
    error::{self, AddCode},
};

static SECRET: Lazy<String> =
    Lazy::new(|| std::env::var("JWT_SECRET").expect("JWT_SECRET must be set"));

pub static ENCODING_KEY: Lazy<EncodingKey> =
    Lazy::new(|| EncodingKey::from_secret(SECRET.as_bytes()));

pub static DECODING_KEY: Lazy<DecodingKey> =
    Lazy::new(|| DecodingKey::from_secret(SECRET.as_bytes()));

/// Session of the caller, decoded from the bearer token and passed
/// explicitly to every service call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Auth {
    Client(ObjectId),
    Team(ObjectId),
    Admin(ObjectId),
    None,
}

impl Auth {
    pub fn new(role: Role, id: ObjectId) -> Self {
        match role {
            Role::Client => Auth::Client(id),
            Role::Team => Auth::Team(id),
            Role::Admin => Auth::Admin(id),
        }
    }

    pub fn id(&self) -> Option<ObjectId> {
        match self {
            Auth::Client(id) | Auth::Team(id) | Auth::Admin(id) => Some(*id),
            Auth::None => None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            Auth::Client(_) => Some(Role::Client),
            Auth::Team(_) => Some(Role::Team),
            Auth::Admin(_) => Some(Role::Admin),
            Auth::None => None,
        }
    }

    /// Id of an authenticated caller, 401 otherwise.
    pub fn authenticated(&self) -> error::Result<ObjectId> {
        self.id()
            .ok_or_else(|| anyhow::anyhow!("Not authorized, no token").code(401))
    }
}

impl From<&User> for Auth {
    fn from(user: &User) -> Self {
        Auth::new(user.role, user.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    role: Role,
    user_id: String,
    exp: i64,
}

impl Auth {
    /// `Ok(None)` when the token has expired.
    pub fn from_token(token: &str) -> error::Result<Option<Self>> {
        match decode::<Claims>(token, &DECODING_KEY, &Validation::new(Algorithm::HS512)) {
            Ok(c) => {
                let claims = c.claims;
                let id = claims
                    .user_id
                    .parse()
                    .map_err(|_| anyhow::anyhow!("Malformed token subject").code(401))?;
                Ok(Some(Auth::new(claims.role, id)))
            }
            Err(err) if err.kind() == &ErrorKind::ExpiredSignature => Ok(None),
            Err(err) => Err(anyhow::anyhow!("Invalid token: {}", err).code(401)),
        }
    }

    pub fn to_token(&self) -> error::Result<String> {
        let header = Header {
            alg: Algorithm::HS512,
            ..Default::default()
        };
        let exp = Utc::now().timestamp() + DURATION.num_seconds();
        let (Some(role), Some(id)) = (self.role(), self.id()) else {
            return Err(anyhow::anyhow!("Cannot create token for Auth::None").code(500));
        };
        let claims = Claims {
            role,
            user_id: id.to_hex(),
            exp,
        };

        let token = match jsonwebtoken::encode(&header, &claims, &ENCODING_KEY) {
            Ok(t) => t,
            Err(_) => return Err(anyhow::anyhow!("Failed to encode token").code(500)),
        };
        Ok(token)
    }
}
