use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitParentPayload {
    #[validate(length(min = 1))]
    pub parent_name: String,
    #[validate(length(min = 1))]
    pub phone: String,
    #[validate(length(min = 1))]
    pub address: String,
    #[validate(length(min = 1))]
    pub student_name: String,
    #[validate(length(min = 1))]
    pub grade: String,
    #[validate(length(min = 1, max = 3, message = "Please select between 1 and 3 subjects"))]
    pub subjects: Vec<String>,
    #[validate(length(min = 1))]
    pub preferred_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateParentStatusPayload {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(subjects: Vec<String>) -> SubmitParentPayload {
        SubmitParentPayload {
            parent_name: "A. Parent".into(),
            phone: "555-0199".into(),
            address: "7 Oak Ave".into(),
            student_name: "Sam".into(),
            grade: "8".into(),
            subjects,
            preferred_time: "evening".into(),
        }
    }

    #[test]
    fn subjects_must_be_between_one_and_three() {
        assert!(payload(vec![]).validate().is_err());
        assert!(payload(vec!["Math".into()]).validate().is_ok());
        assert!(payload(vec![
            "Math".into(),
            "Physics".into(),
            "Chemistry".into(),
            "Biology".into()
        ])
        .validate()
        .is_err());
    }
}
