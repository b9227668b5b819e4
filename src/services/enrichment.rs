use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::models::trip_plan::TripPlan;
use crate::services::photo_service::PhotoLookup;

/// Where a finished lookup writes its URL back into the plan.
enum Target {
    Hotel(usize),
    Attraction(usize),
    Meal { day: usize, meal: usize },
}

/// Concurrently fills in the photo fields of every hotel, attraction and
/// meal in the plan. One fan-out/fan-in batch: all lookups are independent,
/// a semaphore caps how many run at once, and the batch waits for every
/// lookup before returning. A failed lookup leaves that item's field at its
/// prior value; partial enrichment beats failing an otherwise-valid
/// itinerary.
pub async fn enrich_trip_plan<L: PhotoLookup>(
    plan: &mut TripPlan,
    destination: &str,
    lookup: &L,
    max_concurrent: usize,
) {
    let mut jobs: Vec<(Target, String)> = Vec::new();

    for (i, hotel) in plan.accommodation.hotels.iter().enumerate() {
        if !hotel.name.is_empty() {
            jobs.push((Target::Hotel(i), hotel.name.clone()));
        }
    }
    for (i, attraction) in plan.attractions.iter().enumerate() {
        if !attraction.name.is_empty() {
            jobs.push((Target::Attraction(i), attraction.name.clone()));
        }
    }
    for (day, day_plan) in plan.daily_plan.iter().enumerate() {
        for (meal, meal_plan) in day_plan.meals.iter().enumerate() {
            if !meal_plan.restaurant.is_empty() {
                jobs.push((Target::Meal { day, meal }, meal_plan.restaurant.clone()));
            }
        }
    }

    if jobs.is_empty() {
        return;
    }

    println!(
        "Enriching trip plan with {} photo lookups (max {} concurrent)",
        jobs.len(),
        max_concurrent.max(1)
    );

    let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));
    let lookups = jobs.into_iter().map(|(target, name)| {
        let semaphore = semaphore.clone();
        async move {
            let _permit = semaphore.acquire().await;
            match lookup.lookup_photo(&name, destination).await {
                Ok(url) => (target, url),
                Err(err) => {
                    eprintln!("Photo lookup failed for '{}': {}", name, err);
                    (target, None)
                }
            }
        }
    });

    for (target, url) in join_all(lookups).await {
        let Some(url) = url else { continue };
        match target {
            Target::Hotel(i) => {
                if let Some(hotel) = plan.accommodation.hotels.get_mut(i) {
                    hotel.photo_url = Some(url);
                }
            }
            Target::Attraction(i) => {
                if let Some(attraction) = plan.attractions.get_mut(i) {
                    attraction.image_url = Some(url);
                }
            }
            Target::Meal { day, meal } => {
                if let Some(meal_plan) = plan
                    .daily_plan
                    .get_mut(day)
                    .and_then(|d| d.meals.get_mut(meal))
                {
                    meal_plan.image_url = Some(url);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::photo_service::PhotoLookupError;
    use serde_json::json;

    /// Succeeds for names containing "good", errors for names containing
    /// "down", finds nothing for the rest.
    struct StubLookup;

    impl PhotoLookup for StubLookup {
        async fn lookup_photo(
            &self,
            name: &str,
            _location: &str,
        ) -> Result<Option<String>, PhotoLookupError> {
            if name.contains("down") {
                Err(PhotoLookupError::BadResponse("OVER_QUERY_LIMIT".to_string()))
            } else if name.contains("good") {
                Ok(Some(format!("https://photos.test/{}", name)))
            } else {
                Ok(None)
            }
        }
    }

    fn plan_with_items() -> TripPlan {
        serde_json::from_value(json!({
            "tripDetails": {"destination": "Marrakech"},
            "accommodation": {"hotels": [
                {"name": "good hotel"},
                {"name": "down hotel"},
                {"name": "unknown hotel"}
            ]},
            "attractions": [
                {"name": "good attraction"},
                {"name": ""}
            ],
            "dailyPlan": [
                {"day": 1, "meals": [{"restaurant": "good cafe"}, {"restaurant": "down cafe"}]},
                {"day": 2, "meals": [{"restaurant": "unknown cafe"}]}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_best_effort_partial_enrichment() {
        let mut plan = plan_with_items();
        tokio_test::block_on(enrich_trip_plan(&mut plan, "Marrakech", &StubLookup, 10));

        assert_eq!(
            plan.accommodation.hotels[0].photo_url.as_deref(),
            Some("https://photos.test/good hotel")
        );
        assert!(plan.accommodation.hotels[1].photo_url.is_none());
        assert!(plan.accommodation.hotels[2].photo_url.is_none());

        assert_eq!(
            plan.attractions[0].image_url.as_deref(),
            Some("https://photos.test/good attraction")
        );
        assert!(plan.attractions[1].image_url.is_none());

        assert_eq!(
            plan.daily_plan[0].meals[0].image_url.as_deref(),
            Some("https://photos.test/good cafe")
        );
        assert!(plan.daily_plan[0].meals[1].image_url.is_none());
        assert!(plan.daily_plan[1].meals[0].image_url.is_none());
    }

    #[test]
    fn test_enrichment_preserves_unrelated_fields() {
        let mut plan = plan_with_items();
        plan.accommodation.hotels[0]
            .extra
            .insert("rating".to_string(), json!(4.5));
        tokio_test::block_on(enrich_trip_plan(&mut plan, "Marrakech", &StubLookup, 2));

        assert_eq!(plan.accommodation.hotels[0].extra["rating"], json!(4.5));
        assert_eq!(plan.trip_details, json!({"destination": "Marrakech"}));
    }

    #[test]
    fn test_empty_plan_is_a_noop() {
        let mut plan: TripPlan = serde_json::from_value(json!({
            "tripDetails": {},
            "accommodation": {"hotels": []},
            "attractions": [],
            "dailyPlan": []
        }))
        .unwrap();
        tokio_test::block_on(enrich_trip_plan(&mut plan, "Fes", &StubLookup, 10));
        assert!(plan.accommodation.hotels.is_empty());
    }

    #[test]
    fn test_concurrency_cap_of_one_still_completes() {
        let mut plan = plan_with_items();
        tokio_test::block_on(enrich_trip_plan(&mut plan, "Marrakech", &StubLookup, 0));
        assert!(plan.accommodation.hotels[0].photo_url.is_some());
    }
}
