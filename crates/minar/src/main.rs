mod command;
mod favorites;
mod locate;
mod render;
mod session;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use futures_lite::StreamExt;
use macro_rules_attribute::apply;
use smol_macros::main;

use minar_geo::Coordinate;
use minar_osm::nominatim;
use minar_osm::overpass::{self, NearbyQuery, Ranked};

use crate::command::Command;
use crate::favorites::Favorites;
use crate::locate::Locator;
use crate::session::Session;

/// Default search radius around the center.
const DEFAULT_RADIUS_M: u32 = 5000;
/// Environment variable overriding the search radius.
const RADIUS_ENV: &str = "MINAR_RADIUS_M";

/// One completed piece of asynchronous work, delivered to the event loop.
enum Event {
    Line(String),
    Eof,
    Located(Result<Coordinate, locate::Error>),
    Searched {
        query: String,
        outcome: Result<nominatim::Match, minar_osm::Error>,
    },
    Loaded {
        generation: u64,
        outcome: Result<Vec<Ranked>, minar_osm::Error>,
    },
}

#[apply(main!)]
async fn main(executor: Arc<async_executor::Executor<'static>>) {
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,isahc=error")),
        )
        .with_writer(std::io::stderr)
        .init();

    let radius_m = radius_from_env();
    let favorites_path =
        Favorites::default_path().unwrap_or_else(|| PathBuf::from("favorites.json"));
    let favorites = Favorites::load(favorites_path);

    let (events_tx, events_rx) = async_channel::unbounded();

    spawn_stdin_reader(&executor, events_tx.clone());

    println!("{}", render::help());
    status("Locating…");
    spawn_locate(&executor, events_tx.clone());

    run(&executor, &events_rx, &events_tx, radius_m, favorites).await;
}

/// Forward stdin lines into the event loop; signal EOF when stdin closes.
fn spawn_stdin_reader(
    executor: &Arc<async_executor::Executor<'static>>,
    sender: async_channel::Sender<Event>,
) {
    executor
        .spawn(async move {
            use futures_lite::io::AsyncBufReadExt;

            let stdin = blocking::Unblock::new(std::io::stdin());
            let mut lines = futures_lite::io::BufReader::new(stdin).lines();
            while let Some(line) = lines.next().await {
                let Ok(line) = line else { break };
                if sender.send(Event::Line(line)).await.is_err() {
                    return;
                }
            }
            let _ = sender.send(Event::Eof).await;
        })
        .detach();
}

/// One-shot geolocation with a hard client-side deadline.
fn spawn_locate(
    executor: &Arc<async_executor::Executor<'static>>,
    sender: async_channel::Sender<Event>,
) {
    executor
        .spawn(async move {
            let backend = locate::ipapi::Backend;
            let outcome = futures_lite::future::or(backend.locate(), async {
                async_io::Timer::after(locate::ipapi::TIMEOUT + Duration::from_secs(2)).await;
                Err(locate::Error::Timeout)
            })
            .await;
            let _ = sender.send(Event::Located(outcome)).await;
        })
        .detach();
}

/// The event loop: reacts to user commands and completed network calls.
///
/// Network calls run as detached tasks reporting back over the channel.
/// There is no cancellation — a nearby query is tagged with a session
/// generation, and stale responses are dropped on arrival.
async fn run(
    executor: &Arc<async_executor::Executor<'static>>,
    events: &async_channel::Receiver<Event>,
    sender: &async_channel::Sender<Event>,
    radius_m: u32,
    mut favorites: Favorites,
) {
    let overpass = overpass::Client::new();
    let nominatim = nominatim::Client::new();
    let mut session = Session::new();

    while let Ok(event) = events.recv().await {
        match event {
            Event::Eof => break,
            Event::Line(line) => match Command::parse(&line) {
                None => {}
                Some(Command::Quit) => break,
                Some(Command::Help) => println!("{}", render::help()),
                Some(Command::List) => {
                    println!("{}", render::list(session.results(), &favorites));
                }
                Some(Command::Search(query)) => {
                    status("Searching…");
                    let nominatim = nominatim.clone();
                    let sender = sender.clone();
                    executor
                        .spawn(async move {
                            let outcome = nominatim.search(&query).await;
                            let _ = sender.send(Event::Searched { query, outcome }).await;
                        })
                        .detach();
                }
                Some(Command::Recenter) => match session.user_location {
                    Some(center) => {
                        refresh(executor, sender, &overpass, &mut session, center, radius_m);
                    }
                    None => status("Location unavailable. Search a place."),
                },
                Some(Command::Save(index)) => match session.result(index) {
                    Some(ranked) => {
                        let name = ranked.place.name.clone();
                        let saved = favorites.toggle(&ranked.place.id);
                        status(&format!(
                            "{} {name}",
                            if saved { "Saved" } else { "Unsaved" }
                        ));
                    }
                    None => status("No such item"),
                },
                Some(Command::Directions(index)) => match session.result(index) {
                    Some(ranked) => {
                        println!("{}", render::directions_url(ranked.place.coordinate));
                    }
                    None => status("No such item"),
                },
                Some(Command::Show(index)) => match session.result(index) {
                    Some(ranked) => println!("{} @ {}", ranked.place.name, ranked.place.coordinate),
                    None => status("No such item"),
                },
            },
            Event::Located(Ok(center)) => {
                tracing::info!(lat = center.lat(), lon = center.lon(), "located");
                session.user_location = Some(center);
                refresh(executor, sender, &overpass, &mut session, center, radius_m);
            }
            Event::Located(Err(e)) => {
                tracing::warn!(%e, "geolocation failed");
                status("Location unavailable. Search a place.");
            }
            Event::Searched { query, outcome } => match outcome {
                Ok(found) => {
                    tracing::info!(query = %query, name = %found.name, "place search resolved");
                    status(&format!("Centered on {}", found.name));
                    refresh(
                        executor,
                        sender,
                        &overpass,
                        &mut session,
                        found.coordinate,
                        radius_m,
                    );
                }
                Err(minar_osm::Error::NoResults) => status("No results"),
                Err(e) => {
                    tracing::warn!(%e, query = %query, "place search failed");
                    status("Search failed");
                }
            },
            Event::Loaded {
                generation,
                outcome,
            } => match outcome {
                Ok(results) => {
                    let count = results.len();
                    if session.apply_results(generation, results) {
                        println!("{}", render::list(session.results(), &favorites));
                        status(&format!("{count} nearby within {} km", radius_m / 1000));
                    } else {
                        tracing::debug!(generation, "dropped stale nearby results");
                    }
                }
                Err(e) => {
                    // A stale query's failure is not worth a status line.
                    if session.is_current(generation) {
                        tracing::warn!(%e, "nearby query failed");
                        status("Failed to load nearby");
                    }
                }
            },
        }
    }
}

/// Kick off a nearby query around `center` as a detached task.
fn refresh(
    executor: &Arc<async_executor::Executor<'static>>,
    sender: &async_channel::Sender<Event>,
    overpass: &overpass::Client,
    session: &mut Session,
    center: Coordinate,
    radius_m: u32,
) {
    status("Loading nearby…");
    let generation = session.begin_query(center);
    let overpass = overpass.clone();
    let sender = sender.clone();
    executor
        .spawn(async move {
            let query = NearbyQuery {
                center,
                radius_m,
                max_results: None,
            };
            let outcome = overpass.nearby(query).await;
            let _ = sender.send(Event::Loaded { generation, outcome }).await;
        })
        .detach();
}

fn status(message: &str) {
    println!("* {message}");
}

fn radius_from_env() -> u32 {
    match std::env::var(RADIUS_ENV) {
        Ok(raw) => match raw.parse() {
            Ok(radius) => radius,
            Err(_) => {
                tracing::warn!(raw = %raw, "invalid MINAR_RADIUS_M, using default");
                DEFAULT_RADIUS_M
            }
        },
        Err(_) => DEFAULT_RADIUS_M,
    }
}
