use std::fmt;

use reqwest::Client;
use tracing::info;

use crate::config::LookupConfig;
use crate::fetch;
use crate::parse::{self, Dataset, ParseError, Record};
use crate::search::{self, FilterOutcome};

/// Terminal failure states for one load attempt. Both leave the session with
/// an empty dataset until a reload; they are kept distinct because the user
/// needs to know whether data failed to arrive or arrived in an unusable
/// shape.
#[derive(Debug)]
pub enum LoadError {
    /// Non-2xx status or network fault while fetching the CSV.
    Retrieval(anyhow::Error),
    /// CSV arrived, but the required column is missing from its header row.
    Schema { key: String },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Retrieval(err) => write!(f, "failed to retrieve csv data: {err:#}"),
            LoadError::Schema { key } => {
                write!(f, "csv data loaded but unusable: required column '{key}' is missing")
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Retrieval(err) => Some(err.as_ref()),
            LoadError::Schema { .. } => None,
        }
    }
}

/// Owns the loaded dataset, the current query, and the last filter outcome.
///
/// There is exactly one dataset and one outcome at a time; both are replaced
/// wholesale (on reload and on query change respectively), never mutated in
/// place. All state a presentation layer needs flows through this value
/// rather than through globals.
pub struct Session {
    config: LookupConfig,
    dataset: Dataset,
    current_query: String,
    last_outcome: FilterOutcome,
}

impl Session {
    pub fn new(config: LookupConfig) -> Self {
        Self {
            config,
            dataset: Vec::new(),
            current_query: String::new(),
            last_outcome: FilterOutcome::EmptyQuery,
        }
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    /// Fetch and parse the configured source, replacing the dataset. Returns
    /// the number of records loaded. Any previous query state is reset, and a
    /// failure discards the previous dataset too: the session holds no data
    /// until a later load succeeds.
    pub async fn load(&mut self, client: &Client) -> Result<usize, LoadError> {
        self.dataset = Vec::new();
        self.current_query.clear();
        self.last_outcome = FilterOutcome::EmptyQuery;

        let body = fetch::fetch_csv(client, &self.config.source_url)
            .await
            .map_err(LoadError::Retrieval)?;
        let dataset =
            parse::parse_records(&body, &self.config.required_key).map_err(|err| match err {
                ParseError::RequiredKeyMissing { key } => LoadError::Schema { key },
            })?;

        info!(records = dataset.len(), "dataset replaced");
        self.dataset = dataset;
        Ok(self.dataset.len())
    }

    /// Discard the current dataset and load again. A failed load is terminal
    /// for the session until this is called.
    pub async fn reload(&mut self, client: &Client) -> Result<usize, LoadError> {
        self.load(client).await
    }

    pub fn dataset(&self) -> &[Record] {
        &self.dataset
    }

    pub fn current_query(&self) -> &str {
        &self.current_query
    }

    pub fn last_outcome(&self) -> &FilterOutcome {
        &self.last_outcome
    }

    /// Re-evaluate the filter for a new query and remember the outcome.
    /// Callers driving keystroke-level input should sit behind a
    /// [`crate::search::debounce::Debouncer`] so this runs once per pause
    /// rather than once per keystroke.
    pub fn on_query_change(&mut self, query: &str) -> &FilterOutcome {
        self.current_query = query.trim().to_lowercase();
        self.last_outcome = search::filter(
            &self.dataset,
            query,
            &self.config.search_fields,
            self.config.match_mode,
        );
        &self.last_outcome
    }

    /// Look up a record by its ordinal id, for detail views.
    pub fn record_by_id(&self, id: usize) -> Option<&Record> {
        self.dataset.iter().find(|r| r.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_records;

    fn loaded_session() -> Session {
        let csv = "from_content,to_content,types\n\
                   cat,\u{d2a}\u{d42}\u{d1a}\u{d4d}\u{d1a},noun\n\
                   run,\u{d13}\u{d1f}\u{d41}\u{d15},verb";
        let mut session = Session::new(LookupConfig::default());
        session.dataset = parse_records(csv, "fromContent").unwrap();
        session
    }

    #[test]
    fn empty_query_clears_rather_than_matching_everything() {
        let mut session = loaded_session();
        assert_eq!(session.on_query_change("  "), &FilterOutcome::EmptyQuery);
        assert_eq!(session.current_query(), "");
    }

    #[test]
    fn query_change_replaces_the_last_outcome() {
        let mut session = loaded_session();
        session.on_query_change("cat");
        let FilterOutcome::Matches(hits) = session.last_outcome() else {
            panic!("expected matches");
        };
        assert_eq!(hits.len(), 1);
        assert_eq!(session.current_query(), "cat");

        session.on_query_change("zzz");
        let FilterOutcome::Matches(hits) = session.last_outcome() else {
            panic!("expected matches");
        };
        assert!(hits.is_empty());
    }

    #[test]
    fn cloned_outcome_frees_the_session_for_further_reads() {
        // Presentation layers take the outcome by value and then read config
        // from the same session while rendering it.
        let mut session = loaded_session();
        let outcome = session.on_query_change("cat").clone();
        let columns = &session.config().columns;
        let FilterOutcome::Matches(hits) = outcome else {
            panic!("expected matches");
        };
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].get(&columns[0].key), Some("cat"));
    }

    #[tokio::test]
    async fn failed_load_leaves_an_empty_session() {
        let mut session = loaded_session();
        session.on_query_change("cat");
        session.config.source_url = "not a url".to_string();

        let err = session.load(&Client::new()).await.unwrap_err();
        assert!(matches!(err, LoadError::Retrieval(_)));
        assert!(session.dataset().is_empty());
        assert_eq!(session.current_query(), "");
        assert_eq!(session.last_outcome(), &FilterOutcome::EmptyQuery);
    }

    #[test]
    fn record_by_id_addresses_original_line_positions() {
        let session = loaded_session();
        assert_eq!(
            session.record_by_id(2).and_then(|r| r.get("fromContent")),
            Some("run")
        );
        assert!(session.record_by_id(99).is_none());
    }

    #[test]
    fn load_error_messages_distinguish_the_two_failures() {
        let retrieval = LoadError::Retrieval(anyhow::anyhow!("connection refused"));
        let schema = LoadError::Schema {
            key: "fromContent".into(),
        };
        assert!(retrieval.to_string().contains("failed to retrieve"));
        assert!(schema.to_string().contains("unusable"));
        assert!(schema.to_string().contains("fromContent"));
    }
}
