use derive_more::Display;
use mongodb::bson::Bson;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Department an issue is routed to. Team accounts carry one and may only
/// work on issues of the same category.
#[derive(Debug, Display, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
pub enum Category {
    #[serde(rename = "Infrastructure/Facilities")]
    #[display(fmt = "Infrastructure/Facilities")]
    Infrastructure,
    #[serde(rename = "IT/Technical")]
    #[display(fmt = "IT/Technical")]
    Technical,
    #[serde(rename = "HR & Admin")]
    #[display(fmt = "HR & Admin")]
    HrAdmin,
    #[serde(rename = "Security & Access")]
    #[display(fmt = "Security & Access")]
    Security,
    #[serde(rename = "Supplies & Logistics")]
    #[display(fmt = "Supplies & Logistics")]
    Supplies,
    #[serde(rename = "Application/Portal Issues")]
    #[display(fmt = "Application/Portal Issues")]
    Application,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Infrastructure,
        Category::Technical,
        Category::HrAdmin,
        Category::Security,
        Category::Supplies,
        Category::Application,
    ];
}

impl From<Category> for Bson {
    fn from(category: Category) -> Self {
        Bson::String(category.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_names_match_display() {
        for category in Category::ALL {
            let json = serde_json::to_value(category).unwrap();
            assert_eq!(json, serde_json::Value::String(category.to_string()));
        }
    }

    #[test]
    fn unknown_category_is_rejected() {
        assert!(serde_json::from_str::<Category>("\"Kitchen\"").is_err());
        assert_eq!(
            serde_json::from_str::<Category>("\"HR & Admin\"").unwrap(),
            Category::HrAdmin
        );
    }
}
