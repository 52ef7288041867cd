use super::{history_table, prize_table, App};
use std::future::Future;
use wheel_core::{PlayRecord, Subscription, WheelConfig, WheelError};
use wheel_game::{GameError, Result};

pub async fn handle_history(watch: bool, app: &App) -> Result<()> {
    let moderator = app.moderator();

    if !watch {
        print_history(&moderator.history().await?);
        return Ok(());
    }

    let mut history = moderator.watch_history();
    follow(&mut history, tokio::signal::ctrl_c(), "history", |records| {
        print_history(&records)
    })
    .await
}

/// Observer view: prize list and results, both live.
pub async fn handle_watch(app: &App) -> Result<()> {
    let moderator = app.moderator();
    let mut config = moderator.watch_config();
    let mut history = moderator.watch_history();

    println!("Watching the wheel. Press Ctrl-C to stop.");
    watch_until(&mut config, &mut history, tokio::signal::ctrl_c(), app).await
}

/// Renders every update until `shutdown` resolves. `shutdown` is polled
/// across passes, so a signal landing mid-render still ends the loop.
async fn follow<T, S>(
    subscription: &mut Subscription<T>,
    shutdown: S,
    what: &str,
    mut render: impl FnMut(T),
) -> Result<()>
where
    S: Future,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            update = subscription.next() => match update {
                Some(Ok(value)) => render(value),
                Some(Err(e)) => tracing::warn!("{} update failed, showing last known: {}", what, e),
                None => return Err(closed(what)),
            },
            _ = &mut shutdown => return Ok(()),
        }
    }
}

async fn watch_until<S: Future>(
    config: &mut Subscription<Option<WheelConfig>>,
    history: &mut Subscription<Vec<PlayRecord>>,
    shutdown: S,
    app: &App,
) -> Result<()> {
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            update = config.next() => match update {
                Some(Ok(current)) => print_config(current.as_ref(), app),
                Some(Err(e)) => tracing::warn!("Prize list update failed, showing last known: {}", e),
                None => return Err(closed("config")),
            },
            update = history.next() => match update {
                Some(Ok(records)) => print_history(&records),
                Some(Err(e)) => tracing::warn!("History update failed, showing last known: {}", e),
                None => return Err(closed("history")),
            },
            _ = &mut shutdown => return Ok(()),
        }
    }
}

fn closed(what: &str) -> GameError {
    WheelError::SubscriptionClosed(format!("{} feed ended", what)).into()
}

fn print_config(config: Option<&WheelConfig>, app: &App) {
    match config {
        Some(config) if config.is_empty() => println!("Prize list is empty; spins are disabled."),
        Some(config) => {
            println!("Prize list ({} prizes):", config.len());
            println!("{}", prize_table(&config.items));
        }
        None => {
            println!("No prize list yet, participants see the fallback:");
            println!("{}", prize_table(&app.settings.fallback_items));
        }
    }
}

fn print_history(records: &[PlayRecord]) {
    if records.is_empty() {
        println!("No results yet.");
        return;
    }

    println!("Results ({}):", records.len());
    println!("{}", history_table(records));
}
