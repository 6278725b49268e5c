use crate::domain::{DEFAULT_ROLE, Identity, Route, Session, UserId};
use serde::Deserialize;
use url::{Url, form_urlencoded};

pub const AUTHENTICATION_FAILED: &str = "Authentication failed";

/// Every callback entry point resolves to one of these; navigation is written
/// once against this type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CallbackOutcome {
    Authenticated(Session),
    ErrorRedirect(String),
    IncompleteRedirect,
}

impl CallbackOutcome {
    pub fn route(&self) -> Route {
        match self {
            Self::Authenticated(_) => Route::Dashboard,
            Self::ErrorRedirect(reason) => Route::login_with_error(reason.clone()),
            Self::IncompleteRedirect => Route::login_with_error(AUTHENTICATION_FAILED),
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RedirectParams {
    pub token: Option<String>,
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub error: Option<String>,
}

impl RedirectParams {
    /// Accepts a full callback URL, a path with a query, or a bare query string.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let query = match Url::parse(input) {
            Ok(url) => url.query().unwrap_or_default().to_string(),
            Err(_) => match input.split_once('?') {
                Some((_, query)) => query.to_string(),
                None => input.to_string(),
            },
        };
        Self::from_query(&query)
    }

    pub fn from_query(query: &str) -> Self {
        let mut params = Self::default();
        for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            // Empty values count as absent, and the first occurrence wins.
            if value.is_empty() {
                continue;
            }
            let slot = match key.as_ref() {
                "token" => &mut params.token,
                "userId" => &mut params.user_id,
                "username" => &mut params.username,
                "email" => &mut params.email,
                "role" => &mut params.role,
                "error" => &mut params.error,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }
}

pub fn reconcile_redirect_params(params: &RedirectParams) -> CallbackOutcome {
    if let Some(error) = &params.error {
        return CallbackOutcome::ErrorRedirect(error.clone());
    }

    let (Some(token), Some(user_id), Some(username), Some(email), Some(role)) = (
        &params.token,
        &params.user_id,
        &params.username,
        &params.email,
        &params.role,
    ) else {
        return CallbackOutcome::IncompleteRedirect;
    };

    let user_id = match user_id.trim().parse::<i64>() {
        Ok(id) => id,
        Err(_) => return CallbackOutcome::ErrorRedirect(format!("invalid userId: {user_id}")),
    };

    CallbackOutcome::Authenticated(Session::new(
        Identity {
            user_id: UserId::Numeric(user_id),
            username: username.clone(),
            email: email.clone(),
            role: role.clone(),
            image_url: None,
        },
        token.clone(),
    ))
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProviderSessionResponse {
    #[serde(default)]
    pub session: Option<ProviderSession>,
    #[serde(default)]
    pub error: Option<ProviderError>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ProviderError {
    pub message: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ProviderSession {
    pub access_token: String,
    pub user: ProviderUser,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ProviderUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: ProviderUserMetadata,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProviderUserMetadata {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

pub fn reconcile_provider_session(response: ProviderSessionResponse) -> CallbackOutcome {
    if let Some(error) = response.error {
        return CallbackOutcome::ErrorRedirect(error.message);
    }

    match response.session {
        Some(session) if !session.access_token.trim().is_empty() => {
            let identity = identity_from_provider_user(&session.user);
            CallbackOutcome::Authenticated(Session::new(identity, session.access_token))
        }
        _ => CallbackOutcome::ErrorRedirect(AUTHENTICATION_FAILED.to_string()),
    }
}

pub fn identity_from_provider_user(user: &ProviderUser) -> Identity {
    let email = user.email.clone().unwrap_or_default();
    let username = user
        .user_metadata
        .full_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| email_local_part(&email).to_string());

    Identity {
        user_id: UserId::External(user.id.clone()),
        username,
        email,
        role: DEFAULT_ROLE.to_string(),
        image_url: user.user_metadata.avatar_url.clone(),
    }
}

fn email_local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_response(raw: &str) -> ProviderSessionResponse {
        serde_json::from_str(raw).expect("provider response")
    }

    #[test]
    fn complete_params_authenticate_with_integer_user_id() {
        let params = RedirectParams::from_query(
            "token=T&userId=42&username=asha&email=asha%40example.com&role=USER",
        );
        let outcome = reconcile_redirect_params(&params);
        let CallbackOutcome::Authenticated(session) = &outcome else {
            panic!("expected authenticated, got {outcome:?}");
        };
        assert_eq!(session.identity.user_id, UserId::Numeric(42));
        assert_eq!(session.identity.email, "asha@example.com");
        assert_eq!(session.token, "T");
        assert_eq!(outcome.route(), Route::Dashboard);
    }

    #[test]
    fn error_param_short_circuits_everything_else() {
        let params = RedirectParams::from_query(
            "token=T&userId=42&username=u&email=e&role=USER&error=access_denied",
        );
        assert_eq!(
            reconcile_redirect_params(&params),
            CallbackOutcome::ErrorRedirect("access_denied".to_string())
        );
    }

    #[test]
    fn missing_identity_fields_are_incomplete() {
        let params = RedirectParams::from_query("token=T&userId=42");
        let outcome = reconcile_redirect_params(&params);
        assert_eq!(outcome, CallbackOutcome::IncompleteRedirect);
        assert_eq!(
            outcome.route(),
            Route::login_with_error(AUTHENTICATION_FAILED)
        );
    }

    #[test]
    fn empty_token_counts_as_missing() {
        let params =
            RedirectParams::from_query("token=&userId=42&username=u&email=e&role=USER");
        assert_eq!(
            reconcile_redirect_params(&params),
            CallbackOutcome::IncompleteRedirect
        );
    }

    #[test]
    fn non_numeric_user_id_is_an_error_redirect() {
        let params = RedirectParams::from_query("token=T&userId=abc&username=u&email=e&role=R");
        assert!(matches!(
            reconcile_redirect_params(&params),
            CallbackOutcome::ErrorRedirect(reason) if reason.contains("userId")
        ));
    }

    #[test]
    fn parse_accepts_full_url_and_path() {
        let from_url = RedirectParams::parse(
            "http://localhost:5173/auth/google/callback?token=T&error=denied",
        );
        assert_eq!(from_url.token.as_deref(), Some("T"));
        assert_eq!(from_url.error.as_deref(), Some("denied"));

        let from_path = RedirectParams::parse("/auth/google/callback?role=USER");
        assert_eq!(from_path.role.as_deref(), Some("USER"));

        let bare = RedirectParams::parse("?email=a%40b.io");
        assert_eq!(bare.email.as_deref(), Some("a@b.io"));
    }

    #[test]
    fn provider_error_wins() {
        let outcome = reconcile_provider_session(provider_response(
            r#"{"error":{"message":"Invalid grant"},"session":null}"#,
        ));
        assert_eq!(
            outcome,
            CallbackOutcome::ErrorRedirect("Invalid grant".to_string())
        );
    }

    #[test]
    fn provider_session_falls_back_to_email_local_part() {
        let outcome = reconcile_provider_session(provider_response(
            r#"{"session":{"access_token":"at","user":{"id":"uuid-1","email":"ravi@example.com","user_metadata":{"avatar_url":"https://img/a.png"}}}}"#,
        ));
        let CallbackOutcome::Authenticated(session) = outcome else {
            panic!("expected authenticated");
        };
        assert_eq!(session.identity.username, "ravi");
        assert_eq!(session.identity.role, DEFAULT_ROLE);
        assert_eq!(
            session.identity.user_id,
            UserId::External("uuid-1".to_string())
        );
        assert_eq!(
            session.identity.image_url.as_deref(),
            Some("https://img/a.png")
        );
    }

    #[test]
    fn provider_display_name_is_preferred() {
        let outcome = reconcile_provider_session(provider_response(
            r#"{"session":{"access_token":"at","user":{"id":"u","email":"x@y.z","user_metadata":{"full_name":"Ravi Kumar"}}}}"#,
        ));
        let CallbackOutcome::Authenticated(session) = outcome else {
            panic!("expected authenticated");
        };
        assert_eq!(session.identity.username, "Ravi Kumar");
        assert_eq!(session.identity.image_url, None);
    }

    #[test]
    fn no_provider_session_fails_authentication() {
        assert_eq!(
            reconcile_provider_session(provider_response("{}")),
            CallbackOutcome::ErrorRedirect(AUTHENTICATION_FAILED.to_string())
        );
    }
}
