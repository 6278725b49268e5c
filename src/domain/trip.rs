use serde::{Deserialize, Serialize};
use std::fmt;

pub type TripId = i64;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PlanType {
    Budget,
    Balanced,
    Comfort,
    Other(String),
}

impl PlanType {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "BUDGET" => Some(Self::Budget),
            "BALANCED" => Some(Self::Balanced),
            "COMFORT" => Some(Self::Comfort),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Budget => "BUDGET",
            Self::Balanced => "BALANCED",
            Self::Comfort => "COMFORT",
            Self::Other(value) => value,
        }
    }

    pub fn label(&self) -> String {
        format!("{} PLAN", self.as_str())
    }
}

impl From<String> for PlanType {
    fn from(value: String) -> Self {
        Self::parse(&value).unwrap_or(Self::Other(value))
    }
}

impl From<PlanType> for String {
    fn from(value: PlanType) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TripStatus {
    Draft,
    Other(String),
}

impl TripStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Draft => "DRAFT",
            Self::Other(value) => value,
        }
    }

    pub fn is_active_plan(&self) -> bool {
        matches!(self, Self::Draft)
    }
}

impl From<String> for TripStatus {
    fn from(value: String) -> Self {
        if value == "DRAFT" {
            Self::Draft
        } else {
            Self::Other(value)
        }
    }
}

impl From<TripStatus> for String {
    fn from(value: TripStatus) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TravelType {
    Solo,
    Couple,
    Family,
}

impl TravelType {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "SOLO" => Some(Self::Solo),
            "COUPLE" => Some(Self::Couple),
            "FAMILY" => Some(Self::Family),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Solo => "SOLO",
            Self::Couple => "COUPLE",
            Self::Family => "FAMILY",
        }
    }
}

impl fmt::Display for TravelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetBreakdown {
    pub travel_budget: f64,
    pub accommodation_budget: f64,
    pub food_budget: f64,
    pub activities_budget: f64,
    #[serde(default)]
    pub total_allocated: Option<f64>,
    pub travel_percentage: f64,
    pub accommodation_percentage: f64,
    pub food_percentage: f64,
    pub activities_percentage: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BudgetLine {
    pub label: &'static str,
    pub amount: f64,
    pub percent: f64,
}

impl BudgetBreakdown {
    pub fn lines(&self) -> [BudgetLine; 4] {
        [
            BudgetLine {
                label: "Travel",
                amount: self.travel_budget,
                percent: self.travel_percentage,
            },
            BudgetLine {
                label: "Accommodation",
                amount: self.accommodation_budget,
                percent: self.accommodation_percentage,
            },
            BudgetLine {
                label: "Food",
                amount: self.food_budget,
                percent: self.food_percentage,
            },
            BudgetLine {
                label: "Activities",
                amount: self.activities_budget,
                percent: self.activities_percentage,
            },
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub price_per_night: f64,
    pub rating: f64,
    #[serde(default)]
    pub amenities: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: i64,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    pub cost: f64,
    pub duration_hours: u32,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub trip_id: TripId,
    #[serde(default)]
    pub destination_name: String,
    pub start_city: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub number_of_days: u32,
    pub number_of_travelers: u32,
    #[serde(default)]
    pub travel_type: Option<TravelType>,
    pub total_budget: f64,
    pub plan_type: PlanType,
    pub status: TripStatus,
    #[serde(default)]
    pub budget_breakdown: Option<BudgetBreakdown>,
    #[serde(default)]
    pub hotels: Vec<Hotel>,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripCreationRequest {
    pub start_city: String,
    pub start_date: String,
    pub end_date: String,
    pub number_of_travelers: u32,
    pub travel_type: TravelType,
    pub total_budget: f64,
    pub plan_type: PlanType,
}

/// Only the id of the created trip is needed; the rest of the body is the
/// full trip and is fetched again by the detail view.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedTrip {
    pub trip_id: TripId,
}

#[cfg(test)]
pub fn sample_trip(trip_id: TripId, total_budget: f64, status: &str) -> Trip {
    Trip {
        trip_id,
        destination_name: format!("Destination {trip_id}"),
        start_city: "Delhi".to_string(),
        start_date: "2025-01-10".to_string(),
        end_date: "2025-01-12".to_string(),
        number_of_days: 3,
        number_of_travelers: 1,
        travel_type: Some(TravelType::Solo),
        total_budget,
        plan_type: PlanType::Budget,
        status: TripStatus::from(status.to_string()),
        budget_breakdown: None,
        hotels: Vec::new(),
        activities: Vec::new(),
    }
}
