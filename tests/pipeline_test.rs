use atlas_trips_api::services::enrichment::enrich_trip_plan;
use atlas_trips_api::services::photo_service::{PhotoLookup, PhotoLookupError};
use atlas_trips_api::services::trip_pipeline::{recover_trip_plan, RecoveryError};

/// The kind of output the model actually produces on a bad day: fenced,
/// single-quoted, trailing commas everywhere, apostrophes in place names
/// and a parenthetical aside after a price.
const MESSY_MODEL_OUTPUT: &str = r#"```json
{
  'tripDetails': {'origin': 'Casablanca', 'destination': 'Marrakech', 'duration': {'days': 3,},},
  'transportation': {'tips': 'Petit taxis are metered',},
  'accommodation': {'hotels': [
    {'name': 'Riad Yasmine', 'address': "Avenue d'Alger", 'photoUrl': '', 'priceRange': '$$',},
  ],},
  'attractions': [
    {'name': 'Jardin Majorelle', 'details': 'Garden with cobalt blue villa', 'imageUrl': '', 'ticketPrice': '70 MAD' (students 35 MAD),},
  ],
  'dailyPlan': [
    {'day': 1, 'description': 'Medina day', 'meals': [{'restaurant': "Cafe L'Atlas", 'mealType': 'lunch', 'imageUrl': '',}], 'activities': [],},
    {'day': 2, 'meals': [], 'activities': [],},
    {'day': 3, 'meals': [], 'activities': [],},
  ],
  'bestTimeToVisit': 'Spring (March to May)',
}
```"#;

#[test]
fn test_messy_model_output_recovers_to_three_day_plan() {
    let plan = recover_trip_plan(MESSY_MODEL_OUTPUT).expect("pipeline should repair this output");

    assert_eq!(plan.daily_plan.len(), 3);
    assert_eq!(plan.trip_details["destination"], "Marrakech");
    assert_eq!(plan.trip_details["duration"]["days"], 3);

    // Apostrophes must survive repair intact
    assert_eq!(
        plan.accommodation.hotels[0].extra["address"],
        "Avenue d'Alger"
    );
    assert_eq!(plan.daily_plan[0].meals[0].restaurant, "Cafe L'Atlas");

    // The parenthetical aside is gone, the value is not
    assert_eq!(plan.attractions[0].extra["ticketPrice"], "70 MAD");
    assert_eq!(plan.best_time_to_visit, "Spring (March to May)");
}

#[test]
fn test_prose_wrapped_plan_recovers() {
    let raw = r#"Here is your itinerary! {"tripDetails": {"destination": "Fes"}, "accommodation": {"hotels": []}, "attractions": [], "dailyPlan": [{"day": 1}]} Enjoy your trip!"#;
    let plan = recover_trip_plan(raw).unwrap();
    assert_eq!(plan.daily_plan.len(), 1);
}

#[test]
fn test_unrecoverable_output_reports_repair_error() {
    let err = recover_trip_plan("I am sorry, I cannot plan this trip.").unwrap_err();
    match err {
        RecoveryError::Repair(repair) => {
            assert!(!repair.parser_error.is_empty());
            assert!(repair.sample.contains("I am sorry"));
        }
        other => panic!("expected repair error, got {:?}", other),
    }
}

#[test]
fn test_missing_daily_plan_reports_validation_error() {
    let raw = r#"{"tripDetails": {}, "accommodation": {}, "attractions": []}"#;
    let err = recover_trip_plan(raw).unwrap_err();
    assert!(err.to_string().contains("Missing required property: dailyPlan"));
    assert!(err.response_sample().is_none());
}

struct FlakyLookup;

impl PhotoLookup for FlakyLookup {
    async fn lookup_photo(
        &self,
        name: &str,
        _location: &str,
    ) -> Result<Option<String>, PhotoLookupError> {
        if name.starts_with("Riad") {
            Err(PhotoLookupError::BadResponse("REQUEST_DENIED".to_string()))
        } else {
            Ok(Some(format!("https://photos.test/{}", name.replace(' ', "-"))))
        }
    }
}

#[actix_web::test]
async fn test_recovered_plan_enriches_best_effort() {
    let mut plan = recover_trip_plan(MESSY_MODEL_OUTPUT).unwrap();
    enrich_trip_plan(&mut plan, "Marrakech", &FlakyLookup, 10).await;

    // The hotel lookup failed; its field stays empty rather than failing the batch
    assert_eq!(plan.accommodation.hotels[0].photo_url.as_deref(), Some(""));

    assert_eq!(
        plan.attractions[0].image_url.as_deref(),
        Some("https://photos.test/Jardin-Majorelle")
    );
    assert_eq!(
        plan.daily_plan[0].meals[0].image_url.as_deref(),
        Some("https://photos.test/Cafe-L'Atlas")
    );
}
