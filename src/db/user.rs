//! User entity types.

use serde::Serialize;

/// A registered user.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// User ID.
    pub id: i64,
    /// Last name.
    pub nom: String,
    /// First name.
    pub prenom: String,
    /// Email address (unique).
    pub email: String,
    /// Password hash (Argon2 PHC string).
    pub mdp: String,
    /// Account creation timestamp.
    pub created_at: String,
}

impl User {
    /// Public view of this user, without the password hash.
    pub fn as_correspondent(&self) -> Correspondent {
        Correspondent {
            id: self.id,
            nom: self.nom.clone(),
            prenom: self.prenom.clone(),
            email: self.email.clone(),
        }
    }
}

/// New user for creation at signup.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Last name.
    pub nom: String,
    /// First name.
    pub prenom: String,
    /// Email address.
    pub email: String,
    /// Password hash.
    pub mdp: String,
}

impl NewUser {
    /// Create a new user record. `mdp` must already be hashed.
    pub fn new(
        nom: impl Into<String>,
        prenom: impl Into<String>,
        email: impl Into<String>,
        mdp: impl Into<String>,
    ) -> Self {
        Self {
            nom: nom.into(),
            prenom: prenom.into(),
            email: email.into(),
            mdp: mdp.into(),
        }
    }
}

/// Public user identity, as embedded in message payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Correspondent {
    /// User ID.
    pub id: i64,
    /// Last name.
    pub nom: String,
    /// First name.
    pub prenom: String,
    /// Email address.
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user() {
        let user = NewUser::new("Doe", "Jane", "jane@x.com", "$argon2id$hash");
        assert_eq!(user.nom, "Doe");
        assert_eq!(user.prenom, "Jane");
        assert_eq!(user.email, "jane@x.com");
        assert_eq!(user.mdp, "$argon2id$hash");
    }

    #[test]
    fn test_as_correspondent_drops_hash() {
        let user = User {
            id: 1,
            nom: "Doe".to_string(),
            prenom: "Jane".to_string(),
            email: "jane@x.com".to_string(),
            mdp: "$argon2id$hash".to_string(),
            created_at: "2026-01-01 00:00:00".to_string(),
        };

        let correspondent = user.as_correspondent();
        assert_eq!(correspondent.id, 1);
        assert_eq!(correspondent.email, "jane@x.com");

        let json = serde_json::to_value(&correspondent).unwrap();
        assert!(json.get("mdp").is_none());
    }
}
