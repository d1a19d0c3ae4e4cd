use crate::{
    api::{
        self,
        handlers::{AppState, Credentials},
    },
    cli::telemetry,
    session::SessionStore,
};
use anyhow::Result;
use secrecy::SecretString;
use std::{net::IpAddr, sync::Arc, time::Duration};
use tracing::{debug, info};

#[derive(Debug)]
pub struct Args {
    pub listen: IpAddr,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
    pub secure_cookie: bool,
    pub session_idle_seconds: u64,
    pub sweep_interval_seconds: u64,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn execute(args: Args) -> Result<()> {
    debug!("Server args: {:?}", args);

    let store = Arc::new(
        SessionStore::new().with_idle_timeout(Duration::from_secs(args.session_idle_seconds)),
    );

    let credentials = Credentials::new(args.username, args.password);
    if credentials.is_demo() {
        info!("Accepting the demo account alice/bob");
    }

    let state =
        Arc::new(AppState::new(store, credentials).with_secure_cookie(args.secure_cookie));

    let result = api::new(
        args.listen,
        args.port,
        state,
        Duration::from_secs(args.sweep_interval_seconds),
    )
    .await;

    telemetry::shutdown_tracer();

    result
}
