//! Customer login and logout against the Storefront API.
//!
//! The storefront keeps no session store: a successful login yields the
//! customer id, which the route handler signs into the `customer` cookie.

use cove_core::{CustomerId, Email};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::bigcommerce::{CommerceApi, RequestOptions};
use crate::error::{ValidationError, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::models::ActionResult;

const LOGIN_FAILED: &str = "Failed to log in.";

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// The customer who just signed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedIn {
    pub customer_id: CustomerId,
    pub first_name: String,
    pub last_name: String,
}

fn validate(form: &LoginForm) -> Result<Email, ValidationError> {
    let email = form.email.trim();
    if email.is_empty() {
        return Err(ValidationError::Missing("email"));
    }
    if form.password.is_empty() {
        return Err(ValidationError::Missing("password"));
    }
    Ok(Email::parse(email)?)
}

/// Log a customer in.
///
/// Wrong credentials come back as an action error; the caller sets the
/// customer cookie only on success.
#[instrument(skip_all)]
pub async fn login(commerce: &dyn CommerceApi, form: &LoginForm) -> ActionResult<SignedIn> {
    let email = match validate(form) {
        Ok(email) => email,
        Err(e) => return ActionResult::error(e.to_string()),
    };

    let password = SecretString::from(form.password.clone());
    match commerce.login(&email, &password).await {
        Ok(customer) => {
            set_sentry_user(&customer.entity_id, customer.email.as_deref());
            add_breadcrumb("auth", "Customer logged in", &[]);
            tracing::info!(customer_id = %customer.entity_id, "Customer logged in");

            ActionResult::success(SignedIn {
                customer_id: customer.entity_id,
                first_name: customer.first_name.unwrap_or_default(),
                last_name: customer.last_name.unwrap_or_default(),
            })
        }
        Err(e) => super::action_error("login", &e, LOGIN_FAILED),
    }
}

/// Log the customer out.
///
/// The upstream logout is best effort: the caller clears the cookies
/// regardless, so a failure here is only logged.
#[instrument(skip_all)]
pub async fn logout(commerce: &dyn CommerceApi, customer_id: Option<CustomerId>) {
    if let Some(customer_id) = customer_id {
        if let Err(e) = commerce.logout(&RequestOptions::write(Some(customer_id))).await {
            tracing::warn!(error = %e, %customer_id, "Logout mutation failed");
        }
        add_breadcrumb("auth", "Customer logged out", &[]);
    }
    clear_sentry_user();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(email: &str, password: &str) -> LoginForm {
        LoginForm {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_validate_login_form() {
        assert!(validate(&form(" ada@example.com ", "hunter2")).is_ok());
        assert!(matches!(
            validate(&form("", "hunter2")),
            Err(ValidationError::Missing("email"))
        ));
        assert!(matches!(
            validate(&form("ada@example.com", "")),
            Err(ValidationError::Missing("password"))
        ));
        assert!(matches!(
            validate(&form("ada", "hunter2")),
            Err(ValidationError::Email(_))
        ));
    }

    #[test]
    fn test_login_form_debug_hides_password() {
        let debug = format!("{:?}", form("ada@example.com", "hunter2"));
        assert!(debug.contains("ada@example.com"));
        assert!(!debug.contains("hunter2"));
    }
}
