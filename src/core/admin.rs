use crate::config::Config;
use crate::errors::{AppError, AppResult};

/// Shared-secret gate in front of the admin commands.
/// Plain equality against the configured password: it keeps honest users
/// out of the admin screens and nothing more.
pub struct AdminGate<'a> {
    secret: &'a str,
}

impl<'a> AdminGate<'a> {
    pub fn new(secret: &'a str) -> Self {
        Self { secret }
    }

    pub fn from_config(cfg: &'a Config) -> Self {
        Self::new(&cfg.admin_password)
    }

    pub fn verify(&self, password: &str) -> AppResult<()> {
        if password == self.secret {
            Ok(())
        } else {
            Err(AppError::Unauthorized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_only() {
        let gate = AdminGate::new("admin123");
        assert!(gate.verify("admin123").is_ok());
        assert!(matches!(gate.verify("Admin123"), Err(AppError::Unauthorized)));
        assert!(gate.verify("").is_err());
    }
}
