use crate::models::trip_request::TripRequest;

/// Renders the generation prompt for one trip request. Pure string
/// formatting: every preference field ends up in the instructions, and the
/// model is told to answer with JSON only so the recovery pipeline has as
/// little prose to strip as possible.
pub fn build_prompt(request: &TripRequest) -> String {
    let modes = request
        .transportation
        .modes
        .iter()
        .map(|(mode, pref)| format!("{}: {}", mode, pref))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"Create a detailed {duration}-day trip itinerary from {origin} to {destination}, Morocco.

Group Size: {travelers_label} ({travelers_count} travelers)
Dates: {start_date} to {end_date}

Budget Level: {budget_level:?}
Budget Allocation:
- Transportation: {alloc_transport}%
- Accommodation: {alloc_accommodation}%
- Food: {alloc_food}%
- Activities: {alloc_activities}%

Transportation Preferences:
- Preferred Modes: {modes}
- Route Preference: {route_preference}

Accommodation Preferences:
- Type: {accommodation_type}
- Rating: {accommodation_rating} stars
- Required Amenities: {amenities}

Activity Interests: {interests}
Travel Pace: {pace:?}
Rest Days: {rest_days}
Special Requirements: {special_requirements}

Respond with a single JSON object using exactly this structure:
{{
  "tripDetails": {{ "origin": "", "destination": "", "dates": "", "duration": {{ "days": 0 }} }},
  "transportation": {{ }},
  "accommodation": {{ "hotels": [ {{ "name": "", "rating": 0, "address": "", "photoUrl": "", "coordinates": {{ "latitude": 0, "longitude": 0 }}, "description": "", "priceRange": "", "nearbyAttractions": [] }} ] }},
  "attractions": [ {{ "name": "", "details": "", "imageUrl": "", "coordinates": {{ "latitude": 0, "longitude": 0 }}, "ticketPrice": "", "visitDuration": "", "openingHours": "" }} ],
  "dailyPlan": [ {{ "day": 1, "date": "", "description": "", "weather": "", "activities": [ {{ "time": "", "activity": "", "location": "", "coordinates": {{ "latitude": 0, "longitude": 0 }}, "transport": "", "cost": "" }} ], "meals": [ {{ "restaurant": "", "mealType": "", "location": "", "coordinates": {{ "latitude": 0, "longitude": 0 }}, "time": "", "rating": 0, "cuisineType": [], "recommendedDishes": [], "priceRange": "", "imageUrl": "" }} ] }} ],
  "bestTimeToVisit": ""
}}

The dailyPlan array must contain exactly {duration} entries, one per day.
Leave every imageUrl and photoUrl field as an empty string.
Return ONLY the JSON object. No explanations, no markdown code fences, no text before or after the JSON."#,
        duration = request.dates.duration,
        origin = request.origin,
        destination = request.destination,
        travelers_label = request.travelers.label,
        travelers_count = request.travelers.count,
        start_date = request.dates.start_date,
        end_date = request.dates.end_date,
        budget_level = request.budget.level,
        alloc_transport = request.budget.allocations.transportation,
        alloc_accommodation = request.budget.allocations.accommodation,
        alloc_food = request.budget.allocations.food,
        alloc_activities = request.budget.allocations.activities,
        modes = modes,
        route_preference = request.transportation.route_preference,
        accommodation_type = request.accommodation.kind,
        accommodation_rating = request.accommodation.rating,
        amenities = request.accommodation.amenities.join(", "),
        interests = request.activities.interests.join(", "),
        pace = request.activities.pace,
        rest_days = request.activities.schedule.rest_days,
        special_requirements = request.activities.schedule.special_requirements,
    )
}
