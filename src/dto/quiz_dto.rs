use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddQuestionRequest {
    #[validate(length(min = 1, max = 1000))]
    pub text: String,
    #[validate(length(min = 2))]
    pub options: Vec<String>,
    #[validate(length(min = 1, max = 500))]
    pub correct_answer: String,
    pub time_limit: Option<i32>,
    pub points: Option<i32>,
    pub order: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct JoinQuizRequest {
    #[validate(custom(function = validate_join_code))]
    pub code: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitAnswerRequest {
    pub question_id: Uuid,
    #[validate(length(min = 1, max = 500))]
    pub answer: String,
}

fn validate_join_code(code: &str) -> Result<(), ValidationError> {
    if code.len() != 6 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::new("join_code_must_be_six_digits"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_code_accepts_six_digits() {
        let req = JoinQuizRequest {
            code: "042137".to_string(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn join_code_rejects_letters_and_wrong_length() {
        for code in ["12345", "1234567", "12a456", "abcdef", ""] {
            let req = JoinQuizRequest {
                code: code.to_string(),
            };
            assert!(req.validate().is_err(), "code {:?} should be rejected", code);
        }
    }

    #[test]
    fn question_requires_two_options() {
        let req = AddQuestionRequest {
            text: "Capital of France?".to_string(),
            options: vec!["Paris".to_string()],
            correct_answer: "Paris".to_string(),
            time_limit: None,
            points: None,
            order: None,
        };
        assert!(req.validate().is_err());
    }
}
