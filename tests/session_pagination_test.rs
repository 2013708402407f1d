use async_trait::async_trait;
use pixsearch::api_client::{FetchError, ImageSearch, ResultItem, ResultPage};
use pixsearch::page::{PageModel, Severity, Visibility, LOADING_LABEL, LOAD_MORE_LABEL};
use pixsearch::pagination::PAGE_SIZE;
use pixsearch::session::{Applied, FetchKind, SearchSession, SessionPhase};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Client that replays canned results and records every call
struct ScriptedClient {
    responses: Mutex<VecDeque<Result<ResultPage, FetchError>>>,
    calls: Mutex<Vec<(String, u32, u32)>>,
}

impl ScriptedClient {
    fn new(responses: Vec<Result<ResultPage, FetchError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<(String, u32, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageSearch for ScriptedClient {
    async fn fetch_results(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<ResultPage, FetchError> {
        self.calls
            .lock()
            .unwrap()
            .push((query.to_string(), page, page_size));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(FetchError::Transport("script exhausted".to_string())))
    }
}

fn item(n: u64) -> ResultItem {
    ResultItem {
        id: Some(n),
        preview_url: format!("https://cdn.example/{n}_640.jpg"),
        full_url: format!("https://cdn.example/{n}_1280.jpg"),
        page_url: None,
        tags: format!("tag{n}"),
        user: None,
        likes: n,
        views: n,
        comments: n,
        downloads: n,
    }
}

fn page_of(range: std::ops::Range<u64>, total_hits: u64) -> Result<ResultPage, FetchError> {
    Ok(ResultPage {
        items: range.map(item).collect(),
        total_hits,
    })
}

fn card_ids(page: &PageModel) -> Vec<u64> {
    page.gallery
        .cards()
        .iter()
        .filter_map(|c| c.item.id)
        .collect()
}

#[tokio::test]
async fn test_cats_scenario_pages_through_all_results() {
    let client = ScriptedClient::new(vec![
        page_of(0..15, 40),
        page_of(15..30, 40),
        page_of(30..40, 40),
    ]);
    let mut session = SearchSession::new(client.clone());
    let mut page = PageModel::new();

    page.form.set_value("cats");
    let applied = session.submit_search(&mut page, "cats").await;
    assert_eq!(applied, Some(Applied::Applied));
    assert_eq!(session.state().page, 1);
    assert_eq!(session.state().total_hits, 40);
    assert_eq!(page.gallery.len(), 15);
    assert!(page.load_more_visible());
    assert_eq!(session.phase(), SessionPhase::Ready { has_more: true });
    let success = page.toasts.last().unwrap();
    assert_eq!(success.severity, Severity::Success);
    assert_eq!(success.message, "Found 40 images!");

    session.load_more(&mut page).await;
    assert_eq!(session.state().page, 2);
    assert!(page.load_more_visible());
    assert!(page.load_more_actionable());
    assert_eq!(page.gallery.len(), 30);

    session.load_more(&mut page).await;
    assert_eq!(session.state().page, 3);
    assert!(!page.load_more_visible());
    assert_eq!(page.gallery.len(), 40);
    assert_eq!(session.phase(), SessionPhase::Ready { has_more: false });
    let end = page.toasts.last().unwrap();
    assert_eq!(end.severity, Severity::Info);
    assert_eq!(end.title, "End of Results");

    // Terminal state: no further fetch is issued
    assert_eq!(session.load_more(&mut page).await, None);

    assert_eq!(
        client.calls(),
        vec![
            ("cats".to_string(), 1, PAGE_SIZE),
            ("cats".to_string(), 2, PAGE_SIZE),
            ("cats".to_string(), 3, PAGE_SIZE),
        ]
    );
    assert_eq!(card_ids(&page), (0..40).collect::<Vec<_>>());
    assert_eq!(page.lightbox.entries().len(), 40);
}

#[tokio::test]
async fn test_no_results_leaves_gallery_empty() {
    let client = ScriptedClient::new(vec![Err(FetchError::NoResults)]);
    let mut session = SearchSession::new(client);
    let mut page = PageModel::new();

    session.submit_search(&mut page, "zzzznotfound").await;

    assert!(page.gallery.is_empty());
    assert!(!page.load_more_visible());
    assert!(!page.is_loading());
    assert_eq!(session.phase(), SessionPhase::Idle);
    let notice = page.toasts.last().unwrap();
    assert_eq!(notice.severity, Severity::Info);
    assert_eq!(notice.title, "No Results");
    assert_eq!(page.form.reset_count(), 1);
}

#[tokio::test]
async fn test_http_503_shows_error_without_partial_render() {
    let client = ScriptedClient::new(vec![Err(FetchError::Http { status: 503 })]);
    let mut session = SearchSession::new(client);
    let mut page = PageModel::new();

    session.submit_search(&mut page, "mountains").await;

    assert!(page.gallery.is_empty());
    assert!(!page.is_loading());
    assert!(!page.load_more_visible());
    let notice = page.toasts.last().unwrap();
    assert_eq!(notice.severity, Severity::Error);
    assert_eq!(notice.message, "Something went wrong. Please try again later.");
    assert_eq!(session.phase(), SessionPhase::Idle);
}

#[tokio::test]
async fn test_invalid_queries_never_reach_the_client() {
    let client = ScriptedClient::new(vec![]);
    let mut session = SearchSession::new(client.clone());
    let mut page = PageModel::new();
    page.form.set_value("  ");

    assert_eq!(session.submit_search(&mut page, "").await, None);
    assert_eq!(session.submit_search(&mut page, "   \t").await, None);
    assert_eq!(session.submit_search(&mut page, " x ").await, None);

    assert!(client.calls().is_empty());
    assert_eq!(page.toasts.len(), 3);
    assert!(page.toasts.iter().all(|t| t.severity == Severity::Warning));
    assert_eq!(
        page.toasts.last().unwrap().message,
        "Search query must be at least 2 characters long!"
    );
    assert_eq!(page.form.reset_count(), 0);
    assert_eq!(page.loader.as_ref().unwrap().show_count(), 0);
}

#[tokio::test]
async fn test_lenient_validation_accepts_single_character() {
    let client = ScriptedClient::new(vec![page_of(0..3, 3)]);
    let mut session = SearchSession::new(client.clone()).with_strict_validation(false);
    let mut page = PageModel::new();

    session.submit_search(&mut page, " x ").await;
    assert_eq!(client.calls(), vec![("x".to_string(), 1, PAGE_SIZE)]);
    assert!(!page.load_more_visible());
}

#[tokio::test]
async fn test_loader_hidden_once_per_attempt_and_form_reset() {
    let client = ScriptedClient::new(vec![
        page_of(0..15, 30),
        Err(FetchError::Transport("connection reset".to_string())),
    ]);
    let mut session = SearchSession::new(client);
    let mut page = PageModel::new();

    page.form.set_value("birds");
    session.submit_search(&mut page, "birds").await;
    let loader = page.loader.as_ref().unwrap();
    assert_eq!(loader.show_count(), 1);
    assert_eq!(loader.hide_count(), 1);
    assert_eq!(page.form.value(), "");
    assert_eq!(page.form.reset_count(), 1);

    session.load_more(&mut page).await;
    let loader = page.loader.as_ref().unwrap();
    assert_eq!(loader.show_count(), 2);
    assert_eq!(loader.hide_count(), 2);
    assert!(!loader.is_visible());
}

#[tokio::test]
async fn test_load_more_failure_keeps_page_and_retries_same_page() {
    let client = ScriptedClient::new(vec![
        page_of(0..15, 100),
        Err(FetchError::Http { status: 500 }),
        page_of(15..30, 100),
    ]);
    let mut session = SearchSession::new(client.clone());
    let mut page = PageModel::new();

    session.submit_search(&mut page, "sea").await;
    session.load_more(&mut page).await;

    assert_eq!(session.state().page, 2);
    assert_eq!(session.phase(), SessionPhase::Ready { has_more: true });
    let button = page.load_more.as_ref().unwrap();
    assert!(button.is_visible());
    assert!(button.is_enabled());
    assert_eq!(button.label(), LOAD_MORE_LABEL);
    assert_eq!(
        page.toasts.last().unwrap().message,
        "Failed to load more images. Please try again."
    );
    assert_eq!(page.gallery.len(), 15);

    session.load_more(&mut page).await;
    assert_eq!(session.state().page, 2);
    assert_eq!(page.gallery.len(), 30);
    assert_eq!(card_ids(&page), (0..30).collect::<Vec<_>>());

    let pages: Vec<u32> = client.calls().iter().map(|(_, p, _)| *p).collect();
    assert_eq!(pages, vec![1, 2, 2]);
}

#[tokio::test]
async fn test_load_more_appends_without_reordering() {
    let client = ScriptedClient::new(vec![page_of(0..15, 45), page_of(100..115, 45)]);
    let mut session = SearchSession::new(client);
    let mut page = PageModel::new();

    session.submit_search(&mut page, "forest").await;
    let before: Vec<_> = page.gallery.cards().to_vec();
    let refreshes = page.lightbox.refresh_count();

    session.load_more(&mut page).await;
    assert_eq!(&page.gallery.cards()[..15], before.as_slice());
    assert_eq!(&card_ids(&page)[15..], &(100..115).collect::<Vec<_>>()[..]);
    assert_eq!(page.lightbox.refresh_count(), refreshes + 1);
    assert_eq!(page.viewport.offset, page.card_height * 2);
}

#[tokio::test]
async fn test_button_is_busy_while_loading_more() {
    let client = ScriptedClient::new(vec![page_of(0..15, 45)]);
    let mut session = SearchSession::new(client);
    let mut page = PageModel::new();

    session.submit_search(&mut page, "rain").await;
    let ticket = session.begin_load_more(&mut page).unwrap();
    assert_eq!(ticket.kind, FetchKind::LoadMore);
    assert_eq!(ticket.page, 2);

    let button = page.load_more.as_ref().unwrap();
    assert!(!button.is_enabled());
    assert_eq!(button.label(), LOADING_LABEL);
    assert!(page.is_loading());

    // A second activation is refused while the first is pending
    assert!(session.begin_load_more(&mut page).is_none());
    assert_eq!(session.state().page, 2);
}

#[tokio::test]
async fn test_stale_search_outcome_is_discarded() {
    let client = ScriptedClient::new(vec![]);
    let mut session = SearchSession::new(client);
    let mut page = PageModel::new();

    let first = session.begin_search(&mut page, "old query").unwrap();
    let second = session.begin_search(&mut page, "new query").unwrap();

    let applied = session.complete(&mut page, first, page_of(0..15, 99));
    assert_eq!(applied, Applied::Stale);
    assert!(page.gallery.is_empty());
    assert!(page.is_loading());
    assert_eq!(page.form.reset_count(), 0);

    let applied = session.complete(&mut page, second, page_of(50..53, 3));
    assert_eq!(applied, Applied::Applied);
    assert_eq!(card_ids(&page), vec![50, 51, 52]);
    assert_eq!(session.state().query, "new query");
    assert_eq!(session.state().total_hits, 3);
    assert!(!page.is_loading());
}

#[tokio::test]
async fn test_load_more_outcome_after_new_search_is_discarded() {
    let client = ScriptedClient::new(vec![page_of(0..15, 60)]);
    let mut session = SearchSession::new(client);
    let mut page = PageModel::new();

    session.submit_search(&mut page, "cars").await;
    let load_more = session.begin_load_more(&mut page).unwrap();
    let search = session.begin_search(&mut page, "boats").unwrap();

    // New search restored the button and hid it
    let button = page.load_more.as_ref().unwrap();
    assert!(button.is_enabled());
    assert!(!button.is_visible());

    assert_eq!(
        session.complete(&mut page, load_more, page_of(15..30, 60)),
        Applied::Stale
    );
    assert!(page.gallery.is_empty());

    session.complete(&mut page, search, page_of(200..215, 20));
    assert_eq!(session.state().page, 1);
    assert_eq!(page.gallery.len(), 15);
    assert!(page.load_more_visible());
}

#[tokio::test]
async fn test_missing_optional_elements_are_tolerated() {
    let client = ScriptedClient::new(vec![page_of(0..15, 40), page_of(15..30, 40)]);
    let mut session = SearchSession::new(client);
    let mut page = PageModel::new();
    page.loader = None;
    page.load_more = None;

    session.submit_search(&mut page, "snow").await;
    assert_eq!(session.phase(), SessionPhase::Ready { has_more: true });
    session.load_more(&mut page).await;
    assert_eq!(page.gallery.len(), 30);
    assert!(!page.load_more_visible());
}

#[tokio::test]
async fn test_independent_sessions_do_not_share_state() {
    let mut first = SearchSession::new(ScriptedClient::new(vec![page_of(0..15, 40)]));
    let mut second = SearchSession::new(ScriptedClient::new(vec![page_of(0..5, 5)]));
    let mut first_page = PageModel::new();
    let mut second_page = PageModel::new();

    first.submit_search(&mut first_page, "alpha").await;
    second.submit_search(&mut second_page, "beta").await;

    assert_eq!(first.state().total_hits, 40);
    assert_eq!(second.state().total_hits, 5);
    assert!(first.can_load_more());
    assert!(!second.can_load_more());
}

#[tokio::test]
async fn test_spawned_fetch_delivers_outcome() {
    let client = ScriptedClient::new(vec![page_of(0..2, 2)]);
    let mut session = SearchSession::new(client);
    let mut page = PageModel::new();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

    let ticket = session.begin_search(&mut page, "owls").unwrap();
    session.spawn_fetch(ticket.clone(), tx);

    let outcome = rx.recv().await.unwrap();
    assert_eq!(outcome.ticket, ticket);
    assert_eq!(
        session.complete(&mut page, outcome.ticket, outcome.result),
        Applied::Applied
    );
    assert_eq!(page.gallery.len(), 2);
}
