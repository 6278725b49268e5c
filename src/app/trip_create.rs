use crate::domain::{
    CreatedTrip, Route, TripCreationRequest, TripForm, TripFormError, validate_trip_form,
};
use crate::infra::HttpError;
use thiserror::Error;

pub const CREATE_TRIP_FALLBACK_ERROR: &str = "Failed to create trip plan";

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum SubmitBlocked {
    #[error("a trip plan is already being submitted")]
    AlreadySubmitting,

    #[error(transparent)]
    Invalid(#[from] TripFormError),
}

#[derive(Clone, Debug, Default)]
pub struct TripCreateModel {
    form: TripForm,
    submitting: bool,
    error: Option<String>,
}

impl TripCreateModel {
    pub fn new(form: TripForm) -> Self {
        Self {
            form,
            submitting: false,
            error: None,
        }
    }

    pub fn form(&self) -> &TripForm {
        &self.form
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn begin_submit(&mut self) -> Result<TripCreationRequest, SubmitBlocked> {
        if self.is_submitting() {
            return Err(SubmitBlocked::AlreadySubmitting);
        }

        let request = match validate_trip_form(&self.form) {
            Ok(request) => request,
            Err(error) => {
                self.error = Some(error.to_string());
                return Err(error.into());
            }
        };

        self.error = None;
        self.submitting = true;
        Ok(request)
    }

    /// On success returns where to navigate next. The form is never reset.
    pub fn apply(&mut self, result: Result<CreatedTrip, HttpError>) -> Option<Route> {
        self.submitting = false;
        match result {
            Ok(created) => Some(Route::TripDetail(created.trip_id)),
            Err(error) => {
                self.error = Some(
                    error
                        .server_message
                        .unwrap_or_else(|| CREATE_TRIP_FALLBACK_ERROR.to_string()),
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::TripDetailModel;
    use crate::domain::sample_trip;
    use crate::infra::ApiClient;
    use crate::infra::testing::ScriptedTransport;
    use serde_json::json;

    fn filled() -> TripForm {
        TripForm {
            start_city: "Bangalore".to_string(),
            start_date: "2025-06-10".to_string(),
            end_date: "2025-06-14".to_string(),
            number_of_travelers: "3".to_string(),
            travel_type: "FAMILY".to_string(),
            total_budget: "90000".to_string(),
            plan_type: "BALANCED".to_string(),
        }
    }

    #[test]
    fn created_id_is_usable_for_detail_fetch() {
        let transport = ScriptedTransport::new();
        transport.push_ok(json!({"success": true, "data": sample_trip(31, 90000.0, "DRAFT")}));
        transport.push_ok(json!({"success": true, "data": sample_trip(31, 90000.0, "DRAFT")}));
        let client = ApiClient::new(transport.clone());

        let mut model = TripCreateModel::new(filled());
        let request = model.begin_submit().expect("valid form");
        assert!(model.is_submitting());

        let route = model.apply(client.create_trip(&request, Some("jwt")));
        assert_eq!(route, Some(Route::TripDetail(31)));
        assert!(!model.is_submitting());

        let mut detail = TripDetailModel::new();
        let ticket = detail.begin_load(31);
        assert!(detail.apply(&ticket, client.get_trip(31, Some("jwt"))));
        assert_eq!(detail.trip().map(|trip| trip.trip_id), Some(31));

        let paths: Vec<_> = transport.requests().into_iter().map(|r| r.path).collect();
        assert_eq!(paths, vec!["/trips/plan", "/trips/31"]);
    }

    #[test]
    fn server_error_is_shown_verbatim_and_form_kept() {
        let transport = ScriptedTransport::new();
        transport.push_status(400, json!({"message": "Invalid dates"}));
        let client = ApiClient::new(transport);

        let mut model = TripCreateModel::new(filled());
        let request = model.begin_submit().expect("valid form");
        assert_eq!(model.apply(client.create_trip(&request, None)), None);

        assert_eq!(model.error(), Some("Invalid dates"));
        assert_eq!(model.form(), &filled());
        assert!(!model.is_submitting());
    }

    #[test]
    fn error_without_message_uses_fallback() {
        let mut model = TripCreateModel::new(filled());
        model.begin_submit().expect("valid form");
        model.apply(Err(HttpError::transport("connection reset")));
        assert_eq!(model.error(), Some(CREATE_TRIP_FALLBACK_ERROR));
    }

    #[test]
    fn repeat_submission_is_blocked_while_in_flight() {
        let mut model = TripCreateModel::new(filled());
        model.begin_submit().expect("first");
        assert_eq!(model.begin_submit(), Err(SubmitBlocked::AlreadySubmitting));

        model.apply(Err(HttpError::transport("down")));
        assert!(model.begin_submit().is_ok());
    }

    #[test]
    fn invalid_form_never_submits() {
        let mut model = TripCreateModel::new(TripForm::default());
        let blocked = model.begin_submit().expect_err("invalid");
        assert!(matches!(blocked, SubmitBlocked::Invalid(_)));
        assert!(!model.is_submitting());
        assert_eq!(model.error(), Some("start city is required"));
    }
}
