use anyhow::Result;
use reqwest::Client;
use sheetlex::{
    config::LookupConfig,
    search::FilterOutcome,
    session::{LoadError, Session},
};
use std::env;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    // ─── 2) configuration ────────────────────────────────────────────
    let config = match env::var("SHEETLEX_CONFIG") {
        Ok(path) => {
            info!(path = %path, "loading config file");
            LookupConfig::from_file(&path)?
        }
        Err(_) => LookupConfig::default(),
    };
    config.validate()?;

    // ─── 3) fetch + parse ────────────────────────────────────────────
    let client = Client::new();
    let mut session = Session::new(config);
    if !load_and_report(&mut session, &client).await {
        return Ok(());
    }

    // ─── 4) interactive query loop ───────────────────────────────────
    // stdin delivers whole lines, so queries are applied directly here; the
    // Debouncer in search::debounce is for keystroke-driven frontends.
    println!("Type to search. '#<id>' shows a full entry, ':reload' refetches, Ctrl-D exits.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        if input == ":reload" {
            load_and_report(&mut session, &client).await;
        } else if let Some(id) = input.strip_prefix('#') {
            show_detail(&session, id);
        } else {
            run_query(&mut session, input);
        }
    }

    info!("exit");
    Ok(())
}

/// Load (or reload) the dataset and print the user-facing outcome. Returns
/// whether the session ended up with usable data.
async fn load_and_report(session: &mut Session, client: &Client) -> bool {
    println!("Loading dictionary data...");
    match session.load(client).await {
        Ok(0) => {
            println!("Data loaded, but no usable entries were found. Check the sheet contents.");
            false
        }
        Ok(count) => {
            println!("Loaded {count} entries. Start typing to search.");
            true
        }
        Err(err @ LoadError::Retrieval(_)) => {
            error!("{err}");
            println!("Failed to load data. Ensure the sheet is published to the web as CSV.");
            false
        }
        Err(err @ LoadError::Schema { .. }) => {
            error!("{err}");
            println!("Data loaded but unusable: {err}");
            false
        }
    }
}

fn run_query(session: &mut Session, query: &str) {
    // Take the outcome by value so the session is free for config reads.
    let outcome = session.on_query_change(query).clone();
    match outcome {
        FilterOutcome::EmptyQuery => {
            println!("Start typing to search for a word.");
        }
        FilterOutcome::Matches(hits) if hits.is_empty() => {
            println!("No entries found matching your search. Try a different term.");
        }
        FilterOutcome::Matches(hits) => {
            let columns = &session.config().columns;
            let header: Vec<&str> = columns.iter().map(|c| c.label.as_str()).collect();
            println!("  id | {}", header.join(" | "));
            for record in &hits {
                let row: Vec<&str> = columns
                    .iter()
                    .map(|c| record.get(&c.key).unwrap_or(""))
                    .collect();
                println!("{:>4} | {}", record.id, row.join(" | "));
            }
            println!("{} entries found. '#<id>' shows the full entry.", hits.len());
        }
    }
}

fn show_detail(session: &Session, raw_id: &str) {
    let Ok(id) = raw_id.trim().parse::<usize>() else {
        println!("'#{raw_id}' is not a valid entry id.");
        return;
    };
    let Some(record) = session.record_by_id(id) else {
        println!("No entry with id {id}.");
        return;
    };
    for column in &session.config().columns {
        match record.get(&column.key) {
            Some(value) if !value.is_empty() => println!("{}: {value}", column.label),
            _ => println!("{}: (no entry)", column.label),
        }
    }
    // The sheet's optional part-of-speech/example column, when present.
    if let Some(types) = record.get("types").filter(|t| !t.is_empty()) {
        println!("Example: {types}");
    }
}
