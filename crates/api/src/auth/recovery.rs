//! Account recovery challenge.
//!
//! Password reset is gated by a [`RecoveryChallenge`]. The only challenge
//! offered is the three security questions answered at registration.

use gameplan_db::models::user::User;

use crate::auth::password::{hash_password, verify_password};

/// Proof a caller must present before their password can be reset.
pub trait RecoveryChallenge {
    type Payload;

    /// `Ok(false)` when the payload does not satisfy the challenge.
    fn verify(&self, user: &User, payload: &Self::Payload)
        -> Result<bool, argon2::password_hash::Error>;
}

/// Answers to the three security questions, in question order.
#[derive(Debug, Clone)]
pub struct SecurityAnswers(pub [String; 3]);

/// Security-question challenge. Answers compare case-insensitively and
/// ignore surrounding whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecurityQuestions;

impl RecoveryChallenge for SecurityQuestions {
    type Payload = SecurityAnswers;

    fn verify(
        &self,
        user: &User,
        payload: &SecurityAnswers,
    ) -> Result<bool, argon2::password_hash::Error> {
        for (answer, hash) in payload.0.iter().zip(user.security_answer_hashes()) {
            if !verify_password(&normalize_answer(answer), hash)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

pub fn normalize_answer(answer: &str) -> String {
    answer.trim().to_lowercase()
}

/// Normalize and hash answers for storage.
pub fn hash_answers(answers: &[String; 3]) -> Result<[String; 3], argon2::password_hash::Error> {
    let [one, two, three] = answers;
    Ok([
        hash_password(&normalize_answer(one))?,
        hash_password(&normalize_answer(two))?,
        hash_password(&normalize_answer(three))?,
    ])
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn user_with_answers(answers: [&str; 3]) -> User {
        let hashes = hash_answers(&answers.map(String::from)).expect("hashing should succeed");
        let [one, two, three] = hashes;
        User {
            id: 1,
            email: "ada@example.com".into(),
            username: "ada".into(),
            password_hash: String::new(),
            security_answer_one: one,
            security_answer_two: two,
            security_answer_three: three,
            location: None,
            bio: None,
            games_owned: Vec::new(),
            events_attending: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn answers(values: [&str; 3]) -> SecurityAnswers {
        SecurityAnswers(values.map(String::from))
    }

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_answer("  Fluffy \n"), "fluffy");
    }

    #[test]
    fn matching_answers_pass_regardless_of_case() {
        let user = user_with_answers(["Fluffy", "London", "Blue"]);
        let ok = SecurityQuestions
            .verify(&user, &answers(["fluffy", " LONDON", "blue "]))
            .unwrap();
        assert!(ok);
    }

    #[test]
    fn one_wrong_answer_fails() {
        let user = user_with_answers(["Fluffy", "London", "Blue"]);
        let ok = SecurityQuestions
            .verify(&user, &answers(["fluffy", "Paris", "blue"]))
            .unwrap();
        assert!(!ok);
    }
}
