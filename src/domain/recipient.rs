use crate::domain::{RecipientEmail, RecipientName};

#[derive(Debug, Clone)]
pub struct Recipient {
    pub email: RecipientEmail,
    pub name: RecipientName,
}

impl Recipient {
    pub fn parse(email: String, name: String) -> Result<Recipient, String> {
        let email = RecipientEmail::parse(email)?;
        let name = RecipientName::parse(name)?;
        Ok(Recipient { email, name })
    }
}
