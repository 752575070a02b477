//! Search session: owns the state of one named search and drives its requests.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
    sync::Arc,
};

use common::{
    search_const::AND_OPERATOR,
    search_query::SearchState,
    search_result::{SearchResponse, SearchResult},
    transport::SearchTransport,
};
use tokio::sync::{broadcast, watch};

use crate::{
    address_bar::AddressBar,
    api::{
        query_params::SearchContributions,
        search_api::{self, SearchUrl},
    },
    collaborators::{CollaboratorDirectory, FacetsCollaborator, SortCollaborator},
    data_definitions::session_config::SessionConfig,
    error::SearchError,
    events::{EventBus, SearchEvent},
    history::{self, HistoryValues, facets_expression::parse_facets_filters},
    signals::{SearchPhase, SessionSignals},
};

/// What became of a finished search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Applied(Arc<SearchResult>),
    /// A more recent search settled first, this response or failure was dropped.
    Superseded,
}

impl SearchOutcome {
    pub fn result(&self) -> Option<&Arc<SearchResult>> {
        match self {
            Self::Applied(result) => Some(result),
            Self::Superseded => None,
        }
    }
}


#[derive(Debug, Default)]
struct RequestSequence {
    issued: Cell<u64>,
    /// Highest sequence whose outcome, result or failure, was published.
    settled: Cell<u64>,
    in_flight: Cell<u32>,
}

impl RequestSequence {
    fn issue(&self) -> u64 {
        let sequence = self.issued.get() + 1;
        self.issued.set(sequence);
        self.in_flight.set(self.in_flight.get() + 1);
        sequence
    }

    fn settle(&self) {
        self.in_flight.set(self.in_flight.get().saturating_sub(1));
    }

    fn is_stale(&self, sequence: u64) -> bool {
        sequence < self.settled.get()
    }

    fn mark_settled(&self, sequence: u64) {
        self.settled.set(self.settled.get().max(sequence));
    }

    fn is_idle(&self) -> bool {
        self.in_flight.get() == 0
    }
}


async fn next_tick() {
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::TimeoutFuture::new(0).await;
    #[cfg(not(target_arch = "wasm32"))]
    tokio::task::yield_now().await;
}


/// One named search of the page.
///
/// Everything runs on a single thread: state lives in `RefCell`s whose borrows
/// never cross an await, and collaborators are looked up in the directory on
/// every access so that they can come and go.
pub struct SearchSession<T: SearchTransport> {
    config: SessionConfig,
    state: RefCell<SearchState>,
    directory: Rc<dyn CollaboratorDirectory>,
    address_bar: Rc<dyn AddressBar>,
    transport: T,
    signals: watch::Sender<SessionSignals>,
    events: EventBus,
    sequence: RequestSequence,
}

#[cfg(feature = "http")]
pub type HttpSearchSession = SearchSession<transport::HttpTransport>;

#[cfg(feature = "http")]
impl HttpSearchSession {
    /// Session talking to the search API over HTTP, transport settings read from the environment.
    pub fn over_http(
        config: SessionConfig,
        directory: Rc<dyn CollaboratorDirectory>,
        address_bar: Rc<dyn AddressBar>,
        events: EventBus,
    ) -> anyhow::Result<Self> {
        let transport = transport::HttpTransport::from_env()?;
        Ok(Self::new(config, directory, address_bar, transport, events))
    }
}

impl<T: SearchTransport> SearchSession<T> {
    pub fn new(
        config: SessionConfig,
        directory: Rc<dyn CollaboratorDirectory>,
        address_bar: Rc<dyn AddressBar>,
        transport: T,
        events: EventBus,
    ) -> Self {
        let state = config.initial_state();
        let (signals, _receiver) = watch::channel(SessionSignals::default());
        Self {
            config,
            state: RefCell::new(state),
            directory,
            address_bar,
            transport,
            signals,
            events,
            sequence: RequestSequence::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub fn signals(&self) -> watch::Receiver<SessionSignals> {
        self.signals.subscribe()
    }

    pub fn current_signals(&self) -> SessionSignals {
        self.signals.borrow().clone()
    }

    pub fn set_query(&self, query: impl Into<String>) {
        self.state.borrow_mut().query = query.into();
        self.update_search_signals();
    }

    fn sort_element(&self) -> Option<Rc<dyn SortCollaborator>> {
        self.directory.sort(self.name())
    }

    fn related_facets(&self) -> Vec<Rc<dyn FacetsCollaborator>> {
        self.directory.facets(self.name())
    }

    /// Clauses of every bound facets collaborator, joined by AND.
    pub fn facets_filters(&self) -> String {
        self.related_facets()
            .iter()
            .flat_map(|facets| facets.search_filters())
            .collect::<Vec<_>>()
            .join(AND_OPERATOR)
    }

    pub fn reset_facets(&self, launch_search: bool) {
        for facets in self.related_facets() {
            facets.reset(launch_search);
        }
        self.update_search_signals();
    }

    fn contributions(&self) -> SearchContributions {
        let sort = self.sort_element();
        SearchContributions {
            facets_filters: self.facets_filters(),
            facets_names: self
                .related_facets()
                .iter()
                .flat_map(|facets| facets.facets_names())
                .collect(),
            sort_parameters: sort.as_ref().and_then(|sort| sort.sort_parameters()),
            sort_option_id: sort.as_ref().and_then(|sort| sort.sort_option_id()),
            charts: self.directory.charts(self.name()),
        }
    }

    /// Request and history entry the next search on `page` would use, without running it.
    pub fn search_url(&self, page: Option<u32>) -> SearchUrl {
        let contributions = self.contributions();
        search_api::search_url(&self.config, &self.state.borrow(), &contributions, page)
    }

    fn prepare_search(&self, page: u32) -> SearchUrl {
        let contributions = self.contributions();
        let mut state = self.state.borrow_mut();
        state.snapshot_executed(&contributions.facets_filters);
        state.sort_option_id = contributions.sort_option_id.clone();
        state.selected_terms_by_facet = Some(parse_facets_filters(&contributions.facets_filters));
        search_api::search_url(&self.config, &state, &contributions, Some(page))
    }

    pub fn update_search_signals(&self) {
        let facets_filters = self.facets_filters();
        let (is_query_changed, is_facets_changed, can_reset) = {
            let state = self.state.borrow();
            (
                state.is_query_changed(),
                state.is_facets_changed(&facets_filters),
                state.can_reset(&facets_filters),
            )
        };
        self.signals.send_modify(|signals| {
            signals.is_query_changed = is_query_changed;
            signals.is_facets_changed = is_facets_changed;
            signals.is_search_changed = is_query_changed || is_facets_changed;
            signals.can_reset = can_reset;
        });
    }

    /// Run a search on `page`, pages start at 1.
    ///
    /// Overlapping searches all complete; a response or failure older than the
    /// last settled search, applied or failed, is dropped and reported as
    /// [`SearchOutcome::Superseded`].
    pub async fn search(&self, page: u32) -> Result<SearchOutcome, SearchError> {
        if page == 0 {
            return Err(SearchError::InvalidPage(page));
        }
        let sequence = self.sequence.issue();
        let SearchUrl { request, history } = self.prepare_search(page);
        self.address_bar.push_search_params(self.name(), &history);
        self.signals.send_modify(|signals| signals.phase = SearchPhase::Loading);
        self.update_search_signals();

        tracing::info!(
            "search {} #{}: {} {}",
            self.name(),
            sequence,
            request.method.as_str(),
            request.url()
        );
        let response = self.transport.execute(request).await;
        self.sequence.settle();

        if self.sequence.is_stale(sequence) {
            tracing::debug!("search {} #{}: superseded response dropped", self.name(), sequence);
            self.settle_superseded();
            return Ok(SearchOutcome::Superseded);
        }
        match response {
            Ok(response) => Ok(SearchOutcome::Applied(self.apply_response(sequence, response))),
            Err(error) => {
                self.sequence.mark_settled(sequence);
                tracing::warn!("search {} #{} failed: {:#}", self.name(), sequence, error);
                self.fail(format!("{error:#}"));
                Err(SearchError::Transport(error))
            }
        }
    }

    fn loading_or(&self, phase: SearchPhase) -> SearchPhase {
        if self.sequence.is_idle() { phase } else { SearchPhase::Loading }
    }

    fn apply_response(&self, sequence: u64, response: SearchResponse) -> Arc<SearchResult> {
        self.sequence.mark_settled(sequence);
        let result = Arc::new(SearchResult::from_response(self.name(), response));
        {
            let mut state = self.state.borrow_mut();
            state.page_size = result.page_size;
            state.current_page = Some(result.current_page);
            state.page_count = Some(result.page_count);
        }
        let phase = self.loading_or(SearchPhase::Ready);
        self.signals.send_modify(|signals| {
            signals.phase = phase;
            signals.result = Some(result.clone());
            signals.last_error = None;
        });
        self.update_search_signals();
        self.events.publish(SearchEvent::NewResult {
            search_name: self.name().to_string(),
            result: result.clone(),
        });
        result
    }

    fn fail(&self, message: String) {
        let phase = self.loading_or(SearchPhase::Idle);
        self.signals.send_modify(|signals| {
            signals.phase = phase;
            signals.last_error = Some(message);
        });
        self.update_search_signals();
    }

    fn settle_superseded(&self) {
        if !self.sequence.is_idle() {
            return;
        }
        self.signals.send_if_modified(|signals| {
            if !signals.is_search_loading() {
                return false;
            }
            signals.phase = if signals.result.is_some() && signals.last_error.is_none() {
                SearchPhase::Ready
            } else {
                SearchPhase::Idle
            };
            true
        });
    }

    /// Apply values recovered from the address bar to the session and its collaborators.
    pub fn set_values_from_history(&self, values: &HistoryValues) {
        {
            let mut state = self.state.borrow_mut();
            state.query = values.query.clone().unwrap_or_default();
            state.sort_option_id = values.sort_option_id.clone();
            state.selected_terms_by_facet = values.selected_terms_by_facet.clone();
            state.current_page = values.page;
        }
        if let Some(sort) = self.sort_element() {
            sort.set_sort_option_by_id(values.sort_option_id.as_deref());
        }
        if let Some(selected) = &values.selected_terms_by_facet {
            for facets in self.related_facets() {
                facets.set_selected_terms_by_facet(selected);
            }
        }
    }

    /// Startup: restore the address-bar state, then search if there is something to search.
    ///
    /// Waits one scheduling tick first, so that collaborators created in the
    /// same pass are registered before the lookup.
    pub async fn first_search(&self) -> Result<Option<SearchOutcome>, SearchError> {
        next_tick().await;
        let values = history::decode(self.address_bar.current_params(), self.name());
        for (key, _) in values.unrecognized() {
            tracing::debug!("search {}: unrecognized history param {}", self.name(), key);
        }
        self.set_values_from_history(&values);
        if values.has_search_params() || self.config.auto_launch {
            return self.search(values.page.unwrap_or(1)).await.map(Some);
        }
        self.update_search_signals();
        Ok(None)
    }

    /// React to one bus event; events of other sessions are ignored.
    pub async fn handle_event(&self, event: &SearchEvent) -> Result<Option<SearchOutcome>, SearchError> {
        if !event.is_for(self.name()) {
            return Ok(None);
        }
        match event {
            SearchEvent::LaunchSearch { .. } => self.search(1).await.map(Some),
            SearchEvent::LaunchFirstSearch { page, .. } => self.search(page.unwrap_or(1)).await.map(Some),
            SearchEvent::ChangePage { page, .. } => self.search(*page).await.map(Some),
            SearchEvent::FacetSelected { .. } => {
                self.update_search_signals();
                Ok(None)
            }
            SearchEvent::NewResult { .. } => Ok(None),
        }
    }

    /// Handle bus events one after the other, until the bus is closed.
    pub async fn listen(&self, mut receiver: broadcast::Receiver<SearchEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = self.handle_event(&event).await {
                        tracing::warn!("search {}: {}", self.name(), e);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("search {} lagged behind, {} events skipped", self.name(), skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }
}
