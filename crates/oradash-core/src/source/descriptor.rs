//! `user/password@connect_string [as sysdba]` connect descriptors.

use std::fmt;

use super::SourceError;

const SYSDBA_SUFFIX: &str = " as sysdba";

/// Parsed connect descriptor. The password is never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectDescriptor {
    pub user: String,
    pub password: String,
    pub connect_string: String,
    pub sysdba: bool,
}

impl ConnectDescriptor {
    /// Parses `user/password@connect_string`, optionally followed by
    /// ` as sysdba`.
    ///
    /// The user ends at the first `/` and the connect string starts after the
    /// last `@`, so passwords may contain either character.
    pub fn parse(raw: &str) -> Result<Self, SourceError> {
        let trimmed = raw.trim();
        let (body, sysdba) = if trimmed.to_ascii_lowercase().ends_with(SYSDBA_SUFFIX) {
            (trimmed[..trimmed.len() - SYSDBA_SUFFIX.len()].trim_end(), true)
        } else {
            (trimmed, false)
        };

        let (credentials, connect_string) = body.rsplit_once('@').ok_or_else(|| {
            SourceError::InvalidDescriptor("expected user/password@connect_string".to_string())
        })?;
        let (user, password) = credentials.split_once('/').ok_or_else(|| {
            SourceError::InvalidDescriptor("missing '/' between user and password".to_string())
        })?;

        if user.is_empty() {
            return Err(SourceError::InvalidDescriptor("empty user name".to_string()));
        }
        if connect_string.is_empty() {
            return Err(SourceError::InvalidDescriptor(
                "empty connect string".to_string(),
            ));
        }

        Ok(Self {
            user: user.to_string(),
            password: password.to_string(),
            connect_string: connect_string.to_string(),
            sysdba,
        })
    }
}

impl fmt::Debug for ConnectDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectDescriptor")
            .field("user", &self.user)
            .field("password", &"***")
            .field("connect_string", &self.connect_string)
            .field("sysdba", &self.sysdba)
            .finish()
    }
}

impl fmt::Display for ConnectDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.user, self.connect_string)?;
        if self.sysdba {
            write!(f, "{}", SYSDBA_SUFFIX)?;
        }
        Ok(())
    }
}
