//! Update command.

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use apkdex_core::fetch::FetchOutcome;
use apkdex_core::update::update_indexes;

pub async fn run() -> Result<()> {
    let (dirs, config) = super::bootstrap()?;
    let client = apkdex_core::http_client()?;

    // Ctrl-C abandons the in-flight fetch; committed files stay intact.
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.cancel();
        }
    });

    let report = update_indexes(&client, &config, &dirs, &cancel).await?;
    for repo in &report.repos {
        match repo.outcome {
            FetchOutcome::Updated => println!("{}: updated", repo.id),
            FetchOutcome::NotModified => println!("{}: not modified", repo.id),
        }
    }
    if !report.any_updated() {
        println!("all indexes up to date");
    }
    Ok(())
}
