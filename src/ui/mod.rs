use crate::app::{TripDetailModel, TripDetailState, TripListModel};
use crate::domain::{Identity, Trip};
use time::Date;
use time::macros::format_description;

pub fn render_identity(identity: Option<&Identity>) -> Vec<String> {
    let Some(identity) = identity else {
        return vec!["unauthenticated".to_string()];
    };

    let mut lines = vec![
        format!("user_id\t{}", identity.user_id),
        format!("username\t{}", identity.username),
        format!("email\t{}", identity.email),
        format!("role\t{}", identity.role),
    ];
    if let Some(image_url) = &identity.image_url {
        lines.push(format!("image_url\t{image_url}"));
    }
    lines
}

pub fn render_dashboard(model: &TripListModel, user: Option<&Identity>) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(user) = user {
        lines.push(format!("Welcome back, {}!", user.username));
    }

    if model.is_loading() {
        lines.push("Loading trips...".to_string());
        return lines;
    }

    let stats = model.stats();
    lines.push(format!("Total Trips\t{}", stats.trip_count));
    lines.push(format!("Active Plans\t{}", stats.active_plans));
    lines.push(format!("Total Budget\t{}", format_rupees(stats.total_budget)));
    lines.push(String::new());

    if model.trips().is_empty() {
        lines.push("No trips yet".to_string());
        lines.push("Start planning your first adventure with `planora plan`.".to_string());
        return lines;
    }

    lines.push("Your Trips".to_string());
    for trip in model.trips() {
        lines.push(trip_row(trip));
    }
    lines
}

fn trip_row(trip: &Trip) -> String {
    let travelers = if trip.number_of_travelers == 1 {
        "Traveler"
    } else {
        "Travelers"
    };
    format!(
        "{}\t{}\tfrom {}\t{} - {}\t{} {}\t{}\t{} days\t{}\t{}",
        trip.trip_id,
        trip.destination_name,
        trip.start_city,
        format_short_date(&trip.start_date),
        format_short_date(&trip.end_date),
        trip.number_of_travelers,
        travelers,
        format_rupees(trip.total_budget),
        trip.number_of_days,
        trip.plan_type.as_str(),
        trip.status.as_str()
    )
}

pub fn render_trip_detail(model: &TripDetailModel) -> Vec<String> {
    if let TripDetailState::Loading = model.state() {
        return vec!["Loading trip...".to_string()];
    }
    let Some(trip) = model.trip() else {
        return vec!["Trip not found".to_string()];
    };

    let mut lines = vec![
        format!("{}  [{}]", trip.destination_name, trip.plan_type.label()),
        format!("From {}", trip.start_city),
        format!("Duration\t{} Days", trip.number_of_days),
        format!("Travelers\t{}", trip.number_of_travelers),
        format!("Total Budget\t{}", format_rupees(trip.total_budget)),
        format!(
            "Dates\t{} - {}",
            format_short_date(&trip.start_date),
            format_short_date(&trip.end_date)
        ),
    ];
    if let Some(travel_type) = trip.travel_type {
        lines.push(format!("Travel Type\t{travel_type}"));
    }
    lines.push(format!("Status\t{}", trip.status.as_str()));

    lines.push(String::new());
    lines.push("Budget Breakdown".to_string());
    match &trip.budget_breakdown {
        Some(breakdown) => {
            for line in breakdown.lines() {
                lines.push(format!(
                    "  {}\t{}\t{:.1}%",
                    line.label,
                    format_rupees(line.amount),
                    line.percent
                ));
            }
        }
        None => lines.push("  (not available)".to_string()),
    }

    lines.push(String::new());
    lines.push("Recommended Hotels".to_string());
    for hotel in &trip.hotels {
        lines.push(format!(
            "  {}\t{}\t{} / night\t* {}",
            hotel.name,
            hotel.location,
            format_rupees(hotel.price_per_night),
            hotel.rating
        ));
    }

    lines.push(String::new());
    lines.push("Recommended Activities".to_string());
    for activity in &trip.activities {
        lines.push(format!(
            "  {}\t[{}]\t{}\t{}h",
            activity.name,
            activity.category,
            format_rupees(activity.cost),
            activity.duration_hours
        ));
        let description = activity.description.as_deref().map(str::trim);
        if let Some(description) = description.filter(|text| !text.is_empty()) {
            lines.push(format!("    {description}"));
        }
    }
    lines
}

/// Thousands grouped by threes, at most two decimals: `₹123,456.5`.
pub fn format_rupees(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    if fraction == 0 {
        format!("{sign}₹{grouped}")
    } else if fraction % 10 == 0 {
        format!("{sign}₹{grouped}.{}", fraction / 10)
    } else {
        format!("{sign}₹{grouped}.{fraction:02}")
    }
}

/// `2025-03-01` -> `Mar 1`; anything unparseable is shown as-is.
pub fn format_short_date(value: &str) -> String {
    let input = format_description!("[year]-[month]-[day]");
    let output = format_description!("[month repr:short] [day padding:none]");
    Date::parse(value, &input)
        .ok()
        .and_then(|date| date.format(&output).ok())
        .unwrap_or_else(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Activity, BudgetBreakdown, Hotel, sample_trip};

    #[test]
    fn rupees_group_by_thousands() {
        assert_eq!(format_rupees(0.0), "₹0");
        assert_eq!(format_rupees(999.0), "₹999");
        assert_eq!(format_rupees(1000.0), "₹1,000");
        assert_eq!(format_rupees(1234567.5), "₹1,234,567.5");
        assert_eq!(format_rupees(12.05), "₹12.05");
    }

    #[test]
    fn short_dates() {
        assert_eq!(format_short_date("2025-03-01"), "Mar 1");
        assert_eq!(format_short_date("2025-12-25"), "Dec 25");
        assert_eq!(format_short_date("soon"), "soon");
    }

    #[test]
    fn dashboard_shows_totals_and_rows() {
        let mut model = TripListModel::new();
        let ticket = model.begin_load();
        model.apply(
            &ticket,
            Ok(vec![
                sample_trip(1, 1000.0, "DRAFT"),
                sample_trip(2, 2000.0, "BOOKED"),
            ]),
        );

        let lines = render_dashboard(&model, None);
        assert!(lines.contains(&"Total Trips\t2".to_string()));
        assert!(lines.contains(&"Active Plans\t1".to_string()));
        assert!(lines.contains(&"Total Budget\t₹3,000".to_string()));
        assert!(lines.iter().any(|line| line.starts_with("2\tDestination 2")));
    }

    #[test]
    fn empty_dashboard_invites_planning() {
        let mut model = TripListModel::new();
        let ticket = model.begin_load();
        model.apply(&ticket, Ok(Vec::new()));
        assert!(render_dashboard(&model, None).contains(&"No trips yet".to_string()));
    }

    #[test]
    fn detail_renders_breakdown_and_hotels() {
        let mut trip = sample_trip(4, 20000.0, "DRAFT");
        trip.budget_breakdown = Some(BudgetBreakdown {
            travel_budget: 6000.0,
            accommodation_budget: 7000.0,
            food_budget: 4000.0,
            activities_budget: 3000.0,
            total_allocated: Some(20000.0),
            travel_percentage: 30.0,
            accommodation_percentage: 35.0,
            food_percentage: 20.0,
            activities_percentage: 15.0,
        });
        trip.hotels.push(Hotel {
            id: 1,
            name: "Lake Palace".to_string(),
            location: "Udaipur".to_string(),
            price_per_night: 4500.0,
            rating: 4.5,
            amenities: None,
            image_url: None,
        });
        trip.activities.push(Activity {
            id: 2,
            name: "Boat ride".to_string(),
            category: "SIGHTSEEING".to_string(),
            description: Some(" Sunset on Lake Pichola ".to_string()),
            cost: 800.0,
            duration_hours: 1,
            image_url: None,
        });
        trip.activities.push(Activity {
            id: 3,
            name: "City walk".to_string(),
            category: "CULTURE".to_string(),
            description: None,
            cost: 0.0,
            duration_hours: 2,
            image_url: None,
        });

        let mut model = TripDetailModel::new();
        let ticket = model.begin_load(4);
        model.apply(&ticket, Ok(trip));

        let lines = render_trip_detail(&model);
        assert_eq!(lines[0], "Destination 4  [BUDGET PLAN]");
        assert!(lines.contains(&"  Accommodation\t₹7,000\t35.0%".to_string()));
        assert!(lines.contains(&"  Lake Palace\tUdaipur\t₹4,500 / night\t* 4.5".to_string()));
        assert!(lines.contains(&"    Sunset on Lake Pichola".to_string()));
        assert_eq!(lines.last(), Some(&"  City walk\t[CULTURE]\t₹0\t2h".to_string()));
    }

    #[test]
    fn detail_states() {
        let mut model = TripDetailModel::new();
        assert_eq!(render_trip_detail(&model), vec!["Loading trip...".to_string()]);

        let ticket = model.begin_load(9);
        model.apply(&ticket, Err(crate::infra::HttpError::transport("down")));
        assert_eq!(render_trip_detail(&model), vec!["Trip not found".to_string()]);
    }
}
