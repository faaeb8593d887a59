use validator::validate_email;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct UserEmail(String);

impl UserEmail {
    pub fn parse(email: String) -> Result<UserEmail, String> {
        let is_valid_email = validate_email(&email);

        if !is_valid_email {
            return Err(format!("{} email is not valid", email));
        }

        Ok(Self(email))
    }
}

impl AsRef<str> for UserEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
