//! The `batch` command: one whole-list run from environment inputs.

use mylist_config::{BatchEnv, Config};
use mylist_protocols::Credentials;
use tracing::{error, info, warn};

use crate::services::Services;

pub(crate) async fn run_batch(
    config: Config,
    title: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let env = BatchEnv::from_env()?;
    if env.id_list.is_empty() {
        warn!("No identifiers to register");
        return Ok(());
    }
    info!(
        "Batch run for {}: {} identifiers",
        env.email,
        env.id_list.len()
    );

    let services = Services::from_config(&config);
    let credentials = Credentials::new(env.email, env.password);
    let outcome = services
        .batch_run()
        .run(
            &credentials,
            &env.id_list,
            title.as_deref(),
            env.subscription.as_deref(),
        )
        .await
        .inspect_err(|e| error!("Batch run failed: {}", e))?;

    for id in outcome.failed() {
        println!("{}", id);
    }
    info!(
        "Registered {} of {} identifiers",
        outcome.succeeded(),
        outcome.total()
    );
    Ok(())
}

/// Print the encrypted form of `password` for the configured secret.
pub(crate) fn encrypt_password(
    config: &Config,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let services = Services::from_config(config);
    let payload = services.codec.encrypt(password)?;
    println!("{}", payload);
    Ok(())
}
