use derive_more::Display;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Display, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[display(fmt = "client")]
    Client,
    #[display(fmt = "admin")]
    Admin,
    #[display(fmt = "team")]
    Team,
}
