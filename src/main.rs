use campus_vote::{model::Store, service::results};
use log::{error, info, warn, LevelFilter};
use rocket::{Ignite, Rocket};
use thiserror::Error;

/// Errors that are critical to the entire server.
#[derive(Debug, Error)]
enum Error {
    #[error(transparent)]
    Rocket(#[from] rocket::Error),
}

/// Report the state of the election the server is about to open.
async fn log_ballot(rocket: &Rocket<Ignite>) {
    let Some(store) = rocket.state::<Store>() else {
        return;
    };
    match results::results(store).await {
        Ok(results) => {
            info!(
                "{} candidates on the ballot, {} votes cast so far",
                results.candidates.len(),
                results.total_votes
            );
            if let Some(leader) = results.winner.filter(|_| results.total_votes > 0) {
                info!("Current leader: {} with {} votes", leader.name, leader.votes);
            }
        }
        Err(e) => warn!("Could not read the tally at launch: {e}"),
    }
}

async fn run() -> Result<(), Error> {
    info!("Configuring server...");
    let rocket = campus_vote::build().ignite().await?;
    info!("...server configured!");
    log_ballot(&rocket).await;

    // Requests are reported by the logger fairing from here on.
    log4rs_dynamic_filters::DynamicLevelFilter::set("rocket", LevelFilter::Off);
    let _ = rocket.launch().await?;
    Ok(())
}

#[rocket::main]
async fn main() {
    log4rs::init_file("log4rs.yaml", log4rs_dynamic_filters::default_deserializers())
        .expect("Failed to initialise logging");

    if let Err(err) = run().await {
        error!("{err}");
        error!("Critical failure, the polls stay closed");
        std::process::exit(1)
    }
}
