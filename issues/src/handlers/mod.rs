pub mod issue;
pub mod report;
