use crate::domain::TripId;
use url::form_urlencoded;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Route {
    Login { error: Option<String> },
    Dashboard,
    TripDetail(TripId),
}

impl Route {
    pub fn login_with_error(reason: impl Into<String>) -> Self {
        Self::Login {
            error: Some(reason.into()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::Login { error: None } => "/login".to_string(),
            Self::Login {
                error: Some(reason),
            } => {
                let query = form_urlencoded::Serializer::new(String::new())
                    .append_pair("error", reason)
                    .finish();
                format!("/login?{query}")
            }
            Self::Dashboard => "/dashboard".to_string(),
            Self::TripDetail(trip_id) => format!("/trip/{trip_id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_reason_is_url_encoded() {
        let route = Route::login_with_error("bad & worse");
        assert_eq!(route.path(), "/login?error=bad+%26+worse");
    }

    #[test]
    fn plain_routes() {
        assert_eq!(Route::Login { error: None }.path(), "/login");
        assert_eq!(Route::Dashboard.path(), "/dashboard");
        assert_eq!(Route::TripDetail(9).path(), "/trip/9");
    }
}
