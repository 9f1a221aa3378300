use crate::config::AuthConfig;

/// Decides whether a username/password pair identifies the admin.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// The single configured admin account, compared by plain equality.
pub struct StaticCredentials {
    username: String,
    password: String,
}

impl StaticCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.admin_username, &config.admin_password)
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        username == self.username && password == self.password
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_exact_pair_matches() {
        let creds = StaticCredentials::new("admin", "admin");
        assert!(creds.verify("admin", "admin"));
        assert!(!creds.verify("admin", "Admin"));
        assert!(!creds.verify("root", "admin"));
        assert!(!creds.verify("", ""));
    }

    #[test]
    fn defaults_come_from_config() {
        let creds = StaticCredentials::from_config(&AuthConfig::default());
        assert!(creds.verify("admin", "admin"));
    }
}
