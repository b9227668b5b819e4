pub mod response;
pub mod trip_plan;
pub mod trip_request;
