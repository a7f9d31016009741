use anyhow::{Context, bail};
use clap::Parser;
use common::logger::init_logger;
use portfolio::app::{App, assemble};
use portfolio::cli::{Cli, Command, render_detail, render_favorites, render_markets};
use portfolio::config::AppConfig;
use portfolio::controller::{Intent, Notification};
use storage::SqliteStoreFactory;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = AppConfig::from_env();

    init_logger("zenith", cfg.log_json);

    let factory = SqliteStoreFactory::new(cfg.database_url.clone());
    let app = assemble(cfg, &factory).await?;

    run(&app, cli.command).await
}

async fn run(app: &App, command: Command) -> anyhow::Result<()> {
    let controller = &app.controller;
    let mut notifications = controller.take_notifications();

    match command {
        Command::Markets { search, json } => {
            controller.dispatch(Intent::LoadMarkets).await;
            if let Some(query) = search {
                controller.dispatch(Intent::Search(query)).await;
            }

            let state = controller.state();
            report(&mut notifications);

            if let Some(error) = &state.error {
                bail!("could not load markets: {error}");
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&state)?);
            } else {
                print!("{}", render_markets(&state));
            }
        }

        Command::Detail { id, days } => {
            let asset = app
                .repository
                .fetch_market_by_id(&id)
                .await
                .with_context(|| format!("fetching {id}"))?;
            let points = app
                .repository
                .fetch_chart(&id, days)
                .await
                .with_context(|| format!("fetching {} chart for {id}", days.label()))?;

            print!("{}", render_detail(&asset, days, &points));
        }

        Command::Favorite { id } => {
            let was = controller.state().is_favorite(&id);
            controller.dispatch(Intent::ToggleFavorite(id.clone())).await;
            let now = controller.state().is_favorite(&id);

            report(&mut notifications);
            if was == now {
                bail!("favorite for {id} was not changed");
            }
            println!("{id}: {}", if now { "starred" } else { "unstarred" });
        }

        Command::Favorites => {
            print!("{}", render_favorites(&controller.state()));
        }
    }

    Ok(())
}

/// Drains pending notifications to stderr.
fn report(notifications: &mut mpsc::Receiver<Notification>) {
    while let Ok(notification) = notifications.try_recv() {
        match notification {
            Notification::ShowError(message) => eprintln!("error: {message}"),
            Notification::ShowToast(message) => eprintln!("{message}"),
            Notification::ShowCacheWarning => {
                eprintln!("warning: market api unreachable, prices may be outdated")
            }
            Notification::NavigateToDetail(_) => {}
        }
    }
}
