use unicode_segmentation::UnicodeSegmentation;

const MAX_CHAR_LENGTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct UserName(String);

impl UserName {
    pub fn parse(name: String) -> Result<UserName, String> {
        let is_empty_or_whitespace = name.trim().is_empty();
        let is_too_long = name.graphemes(true).count() > MAX_CHAR_LENGTH;

        if is_empty_or_whitespace || is_too_long {
            return Err(format!("{} is not a valid user name", name));
        }

        Ok(Self(name))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
