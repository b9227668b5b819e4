use bson::doc;
use mongodb::{
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client,
};
use std::sync::Arc;
use std::time::Duration;

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Builds the shared MongoDB client and verifies the deployment with a ping
/// against the configured database before the server starts taking traffic.
/// A failed ping is logged, not fatal: the generate pipeline works without
/// the database, only the saved-trip routes need it.
pub async fn create_mongo_client(uri: &str, db_name: &str) -> Arc<Client> {
    println!("Connecting to MongoDB...");

    let mut options = ClientOptions::parse(uri)
        .await
        .expect("MONGODB_URI is not a valid connection string");
    options.connect_timeout = Some(Duration::from_secs(CONNECT_TIMEOUT_SECS));
    options.server_selection_timeout = Some(Duration::from_secs(CONNECT_TIMEOUT_SECS));
    options.max_pool_size = Some(10);
    options.min_pool_size = Some(1);
    options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());

    let client = Client::with_options(options).expect("Failed to create MongoDB client");

    match client.database(db_name).run_command(doc! {"ping": 1}).await {
        Ok(_) => println!("MongoDB connection verified (database '{}')", db_name),
        Err(e) => {
            eprintln!("WARNING: MongoDB ping failed: {}", e);
            eprintln!("Saved-trip routes may be impaired until the connection recovers");
        }
    }

    Arc::new(client)
}
