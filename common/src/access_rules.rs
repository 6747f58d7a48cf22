use crate::{
    auth::Auth,
    entities::{issue::Issue, role::Role, user::User},
    error::{AddCode, ServiceError},
};

pub trait AccessRules<Object, Subject> {
    fn get_access(&self, object: Object, subject: Subject) -> bool;
}

/// Rejection for a failed rule: 401 without a session, 403 otherwise.
pub fn deny(auth: &Auth, message: &str) -> ServiceError {
    match auth {
        Auth::None => anyhow::anyhow!("Not authorized, no token").code(401),
        _ => anyhow::anyhow!("{}", message).code(403),
    }
}

/// Roster management, full issue list, report log.
pub struct Administrate;

/// Opening a new issue.
pub struct Submit;

/// Changing the status of an issue.
pub struct Transition;

impl<'a> AccessRules<&'a Auth, ()> for Administrate {
    fn get_access(&self, auth: &'a Auth, _: ()) -> bool {
        matches!(auth, Auth::Admin(_))
    }
}

impl<'a> AccessRules<&'a Auth, ()> for Submit {
    fn get_access(&self, auth: &'a Auth, _: ()) -> bool {
        matches!(auth, Auth::Client(_))
    }
}

impl<'a, 'b> AccessRules<&'a User, &'b Issue> for Transition {
    fn get_access(&self, actor: &'a User, issue: &'b Issue) -> bool {
        actor.role == Role::Team && actor.category == Some(issue.category)
    }
}

#[cfg(test)]
mod tests {
    use mongodb::bson::oid::ObjectId;

    use super::*;
    use crate::entities::{
        category::Category,
        issue::{Priority, Status},
    };

    fn user(role: Role, category: Option<Category>) -> User {
        User {
            id: ObjectId::new(),
            name: "Sam".to_string(),
            email: "sam@example.com".to_string(),
            password: String::new(),
            salt: String::new(),
            role,
            category,
            created_at: 0,
            last_modified: 0,
        }
    }

    fn issue(category: Category) -> Issue {
        Issue {
            id: ObjectId::new(),
            title: "Badge reader broken".to_string(),
            description: "Main entrance".to_string(),
            category,
            priority: Priority::Medium,
            status: Status::Pending,
            created_by: ObjectId::new(),
            assigned_to: None,
            attachments: Vec::new(),
            created_at: 0,
            last_modified: 0,
        }
    }

    #[test]
    fn transition_needs_matching_category() {
        let issue = issue(Category::Security);
        let same = user(Role::Team, Some(Category::Security));
        let other = user(Role::Team, Some(Category::HrAdmin));
        let admin = user(Role::Admin, None);

        assert!(Transition.get_access(&same, &issue));
        assert!(!Transition.get_access(&other, &issue));
        assert!(!Transition.get_access(&admin, &issue));
    }

    #[test]
    fn role_gates() {
        let id = ObjectId::new();
        assert!(Administrate.get_access(&Auth::Admin(id), ()));
        assert!(!Administrate.get_access(&Auth::Team(id), ()));
        assert!(Submit.get_access(&Auth::Client(id), ()));
        assert!(!Submit.get_access(&Auth::None, ()));
    }
}
