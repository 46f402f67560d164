use database::{DatabaseConnectionInfo, PgDatabase, RetryConfig};
use tracking::client::Client;
use web::{start_web_server, WebConfig, WebState};

#[tokio::main]
async fn main() {
    env_logger::init();

    // database
    let Some(database_connection_info) = DatabaseConnectionInfo::from_env() else {
        log::error!("expected DB_DSN or DATABASE_* connection info in env");
        std::process::exit(1);
    };
    let database =
        match PgDatabase::connect_with_retry(database_connection_info, RetryConfig::from_env())
            .await
        {
            Ok(database) => database,
            Err(why) => {
                log::error!("could not connect to database: {}", why);
                std::process::exit(1);
            }
        };

    // web server
    let web_future = start_web_server(
        WebState {
            tracking_client: Client::new("REST API", database),
        },
        WebConfig::from_env(),
    );

    if let Err(why) = web_future.await {
        log::error!("server error: {}", why);
        std::process::exit(1);
    }
}
