//! Search lifecycle: the input text, the current record or error, and the
//! in-flight flag, owned by one controller and changed only through the
//! transition methods below.

use crate::core::formatter::format_cnpj;
use crate::domain::model::CnpjRecord;
use crate::domain::ports::RegistrySource;
use crate::utils::error::{LookupError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    Loading,
    Result,
    Errored,
}

#[derive(Debug, Default)]
pub struct SearchSession {
    input: String,
    record: Option<CnpjRecord>,
    error: Option<String>,
    loading: bool,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn record(&self) -> Option<&CnpjRecord> {
        self.record.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn state(&self) -> SearchState {
        if self.loading {
            SearchState::Loading
        } else if self.record.is_some() {
            SearchState::Result
        } else if self.error.is_some() {
            SearchState::Errored
        } else {
            SearchState::Idle
        }
    }

    /// Replaces the input with its masked form.
    pub fn type_input(&mut self, raw: &str) -> &str {
        self.input = format_cnpj(raw);
        &self.input
    }

    /// Starts a search. Returns the identifier to fetch, or `None` when the
    /// input is empty, in which case any previous result is dropped and the
    /// session is back to Idle. A second search while one is in flight is
    /// rejected.
    pub fn begin_search(&mut self) -> Result<Option<String>> {
        if self.loading {
            tracing::warn!("Search for {} already in progress", self.input);
            return Err(LookupError::SearchInProgress);
        }

        self.error = None;
        self.record = None;
        if self.input.is_empty() {
            return Ok(None);
        }

        self.loading = true;
        Ok(Some(self.input.clone()))
    }

    pub fn complete(&mut self, outcome: Result<CnpjRecord>) {
        self.loading = false;
        match outcome {
            Ok(record) => {
                tracing::info!("✅ Found {} ({})", record.nome, record.cnpj);
                self.record = Some(record);
                self.error = None;
            }
            Err(e) => {
                tracing::debug!("Lookup failed: {} (Category: {:?})", e, e.category());
                self.record = None;
                self.error = Some(e.user_friendly_message());
            }
        }
    }

    pub async fn submit<R: RegistrySource + ?Sized>(&mut self, source: &R) -> Result<SearchState> {
        let Some(identifier) = self.begin_search()? else {
            return Ok(self.state());
        };

        let outcome = source.fetch_record(&identifier).await;
        self.complete(outcome);
        Ok(self.state())
    }

    pub fn new_search(&mut self) {
        self.input.clear();
        self.record = None;
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubSource {
        calls: AtomicUsize,
        outcome: fn() -> Result<CnpjRecord>,
    }

    #[async_trait]
    impl RegistrySource for StubSource {
        async fn fetch_record(&self, _raw_identifier: &str) -> Result<CnpjRecord> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.outcome)()
        }
    }

    fn record() -> Result<CnpjRecord> {
        Ok(serde_json::from_value(serde_json::json!({
            "cnpj": "11.222.333/0001-81",
            "nome": "EMPRESA EXEMPLO LTDA",
            "situacao": "ATIVA"
        }))?)
    }

    fn not_found() -> Result<CnpjRecord> {
        Err(LookupError::not_found(None))
    }

    #[test]
    fn test_begin_search_rejects_overlap() {
        let mut session = SearchSession::new();
        session.type_input("11222333000181");

        assert_eq!(
            session.begin_search().unwrap().as_deref(),
            Some("11.222.333/0001-81")
        );
        assert_eq!(session.state(), SearchState::Loading);
        assert!(matches!(
            session.begin_search(),
            Err(LookupError::SearchInProgress)
        ));
    }

    #[tokio::test]
    async fn test_empty_input_is_ignored() {
        let source = StubSource {
            calls: AtomicUsize::new(0),
            outcome: record,
        };
        let mut session = SearchSession::new();

        let state = session.submit(&source).await.unwrap();
        assert_eq!(state, SearchState::Idle);
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_result_then_new_search_returns_to_idle() {
        let source = StubSource {
            calls: AtomicUsize::new(0),
            outcome: record,
        };
        let mut session = SearchSession::new();
        session.type_input("11.222.333/0001-81");

        assert_eq!(session.submit(&source).await.unwrap(), SearchState::Result);
        assert!(session.record().is_some());
        assert!(session.error().is_none());
        assert!(!session.is_loading());

        session.new_search();
        assert_eq!(session.state(), SearchState::Idle);
        assert_eq!(session.input(), "");
        assert!(session.record().is_none());
        assert!(session.error().is_none());
    }

    #[tokio::test]
    async fn test_failure_clears_previous_record() {
        let ok = StubSource {
            calls: AtomicUsize::new(0),
            outcome: record,
        };
        let failing = StubSource {
            calls: AtomicUsize::new(0),
            outcome: not_found,
        };
        let mut session = SearchSession::new();
        session.type_input("11222333000181");
        session.submit(&ok).await.unwrap();

        let state = session.submit(&failing).await.unwrap();
        assert_eq!(state, SearchState::Errored);
        assert!(session.record().is_none());
        assert_eq!(session.error(), Some("CNPJ não encontrado ou inválido."));
        assert_eq!(session.input(), "11.222.333/0001-81");
    }

    #[tokio::test]
    async fn test_non_digit_input_after_result_drops_the_card() {
        let source = StubSource {
            calls: AtomicUsize::new(0),
            outcome: record,
        };
        let mut session = SearchSession::new();
        session.type_input("11222333000181");
        assert_eq!(session.submit(&source).await.unwrap(), SearchState::Result);

        session.type_input("abc");
        let state = session.submit(&source).await.unwrap();

        assert_eq!(state, SearchState::Idle);
        assert_eq!(session.input(), "");
        assert!(session.record().is_none());
        assert!(session.error().is_none());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }
}
