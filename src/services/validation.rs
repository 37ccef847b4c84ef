use crate::errors::{CoreError, CoreResult};

/// Stateless input validation helpers shared by the services and handlers.
pub struct ValidationService;

impl ValidationService {
    pub fn validate_email(email: &str) -> CoreResult<()> {
        if email.is_empty() {
            return Err(CoreError::validation_field("email", "Email cannot be empty"));
        }

        if email.len() > 254 {
            return Err(CoreError::validation_field("email", "Email is too long"));
        }

        let parts: Vec<&str> = email.split('@').collect();
        if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
            return Err(CoreError::validation_field("email", "Invalid email format"));
        }

        let domain = parts[1];
        if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return Err(CoreError::validation_field("email", "Invalid email domain"));
        }

        Ok(())
    }

    pub fn validate_display_name(display_name: &str) -> CoreResult<()> {
        if display_name.trim().is_empty() {
            return Err(CoreError::validation_field(
                "displayName",
                "Display name cannot be empty",
            ));
        }

        if display_name.len() > 100 {
            return Err(CoreError::validation_field(
                "displayName",
                "Display name is too long (max 100 characters)",
            ));
        }

        Ok(())
    }

    pub fn validate_password(password: &str) -> CoreResult<()> {
        if password.len() < 8 {
            return Err(CoreError::validation_field(
                "password",
                "Password must be at least 8 characters long",
            ));
        }

        Ok(())
    }

    /// Property, room type and competitor names share the same constraints.
    pub fn validate_name(field: &str, name: &str) -> CoreResult<()> {
        if name.trim().is_empty() {
            return Err(CoreError::validation_field(field, "Name cannot be empty"));
        }

        if name.len() > 200 {
            return Err(CoreError::validation_field(
                field,
                "Name is too long (max 200 characters)",
            ));
        }

        Ok(())
    }

    pub fn validate_base_url(url: &str) -> CoreResult<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(CoreError::validation_field(
                "baseUrl",
                "URL must start with http:// or https://",
            ));
        }

        Ok(())
    }

    /// ISO 4217-shaped currency code: three ASCII letters.
    pub fn validate_currency(currency: &str) -> CoreResult<()> {
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CoreError::validation_field(
                "currency",
                "Currency must be a three-letter code",
            ));
        }

        Ok(())
    }

    pub fn validate_lookahead_days(days: i32) -> CoreResult<()> {
        if !(1..=365).contains(&days) {
            return Err(CoreError::validation_field(
                "defaultLookaheadDays",
                "Lookahead days must be between 1 and 365",
            ));
        }

        Ok(())
    }

    /// Shallow shape check for cron expressions: five whitespace-separated
    /// fields. The workflow engine owns actual cron semantics.
    pub fn validate_cron(field: &str, cron: &str) -> CoreResult<()> {
        if cron.split_whitespace().count() != 5 {
            return Err(CoreError::validation_field(
                field,
                "Cron expression must have five fields",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_email() {
        assert!(ValidationService::validate_email("guest@example.com").is_ok());
    }

    #[test]
    fn rejects_malformed_emails() {
        for bad in ["", "no-at-sign", "two@@example.com", "user@nodot", "user@.com"] {
            assert!(ValidationService::validate_email(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn rejects_short_password() {
        assert!(ValidationService::validate_password("short").is_err());
        assert!(ValidationService::validate_password("long enough").is_ok());
    }

    #[test]
    fn currency_must_be_three_letters() {
        assert!(ValidationService::validate_currency("EUR").is_ok());
        assert!(ValidationService::validate_currency("EURO").is_err());
        assert!(ValidationService::validate_currency("E1R").is_err());
    }

    #[test]
    fn cron_needs_five_fields() {
        assert!(ValidationService::validate_cron("cron", "0 */2 * * *").is_ok());
        assert!(ValidationService::validate_cron("cron", "hourly").is_err());
    }

    #[test]
    fn lookahead_bounds() {
        assert!(ValidationService::validate_lookahead_days(0).is_err());
        assert!(ValidationService::validate_lookahead_days(1).is_ok());
        assert!(ValidationService::validate_lookahead_days(365).is_ok());
        assert!(ValidationService::validate_lookahead_days(366).is_err());
    }
}
