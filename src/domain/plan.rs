use crate::domain::{PlanType, TravelType, TripCreationRequest};
use thiserror::Error;
use time::Date;
use time::macros::format_description;

/// Raw values as typed into the plan-trip form. Kept verbatim across failed
/// submissions so the user can correct them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TripForm {
    pub start_city: String,
    pub start_date: String,
    pub end_date: String,
    pub number_of_travelers: String,
    pub travel_type: String,
    pub total_budget: String,
    pub plan_type: String,
}

impl Default for TripForm {
    fn default() -> Self {
        Self {
            start_city: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            number_of_travelers: "1".to_string(),
            travel_type: TravelType::Solo.as_str().to_string(),
            total_budget: String::new(),
            plan_type: PlanType::Balanced.as_str().to_string(),
        }
    }
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum TripFormError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{field} must be a number: {value}")]
    NotANumber { field: &'static str, value: String },

    #[error("{0} must be greater than 0")]
    NotPositive(&'static str),

    #[error("{field} must be a date (YYYY-MM-DD): {value}")]
    InvalidDate { field: &'static str, value: String },

    #[error("travel type must be SOLO, COUPLE, or FAMILY: {0}")]
    UnknownTravelType(String),

    #[error("plan type must be BUDGET, BALANCED, or COMFORT: {0}")]
    UnknownPlanType(String),
}

pub fn validate_trip_form(form: &TripForm) -> Result<TripCreationRequest, TripFormError> {
    let start_city = required("start city", &form.start_city)?;
    let start_date = parse_date("start date", &form.start_date)?;
    let end_date = parse_date("end date", &form.end_date)?;

    let travelers = required("number of travelers", &form.number_of_travelers)?;
    let number_of_travelers =
        travelers
            .parse::<u32>()
            .map_err(|_| TripFormError::NotANumber {
                field: "number of travelers",
                value: travelers.to_string(),
            })?;
    if number_of_travelers == 0 {
        return Err(TripFormError::NotPositive("number of travelers"));
    }

    let travel_type = required("travel type", &form.travel_type)?;
    let travel_type = TravelType::parse(travel_type)
        .ok_or_else(|| TripFormError::UnknownTravelType(travel_type.to_string()))?;

    let budget = required("total budget", &form.total_budget)?;
    let total_budget = budget
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| TripFormError::NotANumber {
            field: "total budget",
            value: budget.to_string(),
        })?;
    if total_budget <= 0.0 {
        return Err(TripFormError::NotPositive("total budget"));
    }

    let plan_type = required("plan type", &form.plan_type)?;
    let plan_type = PlanType::parse(plan_type)
        .ok_or_else(|| TripFormError::UnknownPlanType(plan_type.to_string()))?;

    Ok(TripCreationRequest {
        start_city: start_city.to_string(),
        start_date,
        end_date,
        number_of_travelers,
        travel_type,
        total_budget,
        plan_type,
    })
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, TripFormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TripFormError::Missing(field));
    }
    Ok(trimmed)
}

fn parse_date(field: &'static str, value: &str) -> Result<String, TripFormError> {
    let value = required(field, value)?;
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(value, &format).map_err(|_| TripFormError::InvalidDate {
        field,
        value: value.to_string(),
    })?;
    Ok(value.to_string())
}
