use chrono::Duration;
use lazy_static::lazy_static;

lazy_static! {
    pub static ref DURATION: Duration = Duration::days(30);
}

pub const USERS_COLLECTION: &str = "users";
pub const ISSUES_COLLECTION: &str = "issues";
pub const REPORTS_COLLECTION: &str = "reports";

pub const STATUS_UPDATE_ACTION: &str = "status update";
