use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, sleep};

use super::*;
use crate::entity::{Department, DepartmentDraft, Record, RecordId};
use crate::error::StewardError;
use crate::remote::memory::Call;
use crate::remote::{CollectionRequest, InMemoryCollection};

type Controller = ListSyncController<InMemoryCollection<Department>>;

fn department(id: u64, name: &str) -> Department {
    Department::from_draft(
        RecordId::from(id),
        DepartmentDraft {
            name: name.to_string(),
            description: None,
        },
    )
}

fn departments(count: u64) -> Vec<Department> {
    (1..=count)
        .map(|n| department(n, &format!("Department {n:02}")))
        .collect()
}

fn acme_dataset() -> Vec<Department> {
    vec![
        department(1, "Acme Corp"),
        department(2, "Beta LLC"),
        department(3, "Acme2"),
    ]
}

fn controller(records: Vec<Department>) -> Controller {
    ListSyncController::new(InMemoryCollection::new(records), ControllerOptions::new(12))
}

fn draft(name: &str) -> DepartmentDraft {
    DepartmentDraft {
        name: name.to_string(),
        description: None,
    }
}

fn page(page: u32) -> CollectionRequest {
    CollectionRequest::Page {
        page,
        page_size: 12,
    }
}

fn names(controller: &Controller) -> Vec<String> {
    controller
        .snapshot()
        .page
        .items
        .iter()
        .map(|d| d.name.clone())
        .collect()
}

#[tokio::test]
async fn test_server_pagination_uses_headers() {
    let controller = controller(departments(30));
    controller.mount().await;

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.status, LoadStatus::Ready);
    assert_eq!(snapshot.page.total_pages, 3);
    assert_eq!(snapshot.page.total_count, 30);
    assert_eq!(snapshot.page.items.len(), 12);

    controller.go_to_page(2).await;

    let snapshot = controller.snapshot();
    assert_eq!(controller.client().list_requests().last(), Some(&page(2)));
    assert_eq!(snapshot.query.page, 2);
    assert_eq!(snapshot.page.total_pages, 3);
    assert_eq!(snapshot.page.total_count, 30);
    assert_eq!(snapshot.page.items[0].name, "Department 13");
}

#[tokio::test]
async fn test_search_filters_whole_collection() {
    let controller = controller(acme_dataset());
    controller.mount().await;

    controller.set_search_text("acme");
    controller.submit_search_immediately().await;

    let snapshot = controller.snapshot();
    assert_eq!(names(&controller), vec!["Acme Corp", "Acme2"]);
    assert_eq!(snapshot.page.total_count, 2);
    assert_eq!(snapshot.page.total_pages, 1);
    assert_eq!(snapshot.page.totals, TotalsOrigin::Filtered);
    assert_eq!(
        controller.client().list_requests().last(),
        Some(&CollectionRequest::Search {
            text: "acme".to_string()
        })
    );
}

#[tokio::test]
async fn test_search_pins_single_page() {
    let controller = controller(departments(30));
    controller.mount().await;
    controller.go_to_page(3).await;
    assert_eq!(controller.snapshot().query.page, 3);

    controller.set_search_text("  Department 1 ");
    controller.submit_search_immediately().await;

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.query.search, "Department 1");
    assert_eq!(snapshot.query.page, 1);
    assert_eq!(snapshot.page.total_pages, 1);
    assert_eq!(snapshot.page.total_count, 10);
    assert_eq!(snapshot.page.items.len(), 10);

    // Paging is meaningless while searching.
    controller.go_to_page(2).await;
    assert_eq!(controller.snapshot().query.page, 1);
}

#[tokio::test]
async fn test_custom_matcher() {
    let backend = InMemoryCollection::new(vec![
        department(1, "Acme Corp"),
        department(2, "Not Acme"),
    ]);
    let controller = ListSyncController::builder(backend, ControllerOptions::new(12))
        .matcher(|department: &Department, needle: &str| {
            department.name.to_lowercase().starts_with(needle)
        })
        .build();

    controller.set_search_text("ACME");
    controller.submit_search_immediately().await;

    assert_eq!(names(&controller), vec!["Acme Corp"]);
}

#[tokio::test(start_paused = true)]
async fn test_stale_fetch_is_discarded() {
    let backend = InMemoryCollection::new(acme_dataset()).with_list_latency(|request| {
        if request.is_search() {
            Duration::from_millis(1000)
        } else {
            Duration::from_millis(10)
        }
    });
    let controller = ListSyncController::new(backend, ControllerOptions::new(12));
    controller.mount().await;

    let slow = controller.clone();
    let search = tokio::spawn(async move {
        slow.set_search_text("acme");
        slow.submit_search_immediately().await;
    });

    sleep(Duration::from_millis(100)).await;
    controller.set_search_text("");
    controller.submit_search_immediately().await;
    assert_eq!(names(&controller).len(), 3);

    search.await.unwrap();

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.query.search, "");
    assert_eq!(snapshot.status, LoadStatus::Ready);
    assert_eq!(names(&controller), vec!["Acme Corp", "Beta LLC", "Acme2"]);
    assert!(
        controller
            .client()
            .list_requests()
            .iter()
            .any(CollectionRequest::is_search)
    );
}

#[tokio::test(start_paused = true)]
async fn test_debounce_coalesces_keystrokes() {
    let controller = controller(acme_dataset());
    controller.mount().await;

    let start = Instant::now();
    for text in ["a", "ac", "acm", "acme"] {
        controller.set_search_text(text);
        sleep(Duration::from_millis(100)).await;
    }
    assert!(controller.has_pending_search());
    assert_eq!(controller.snapshot().pending_search, "acme");
    assert_eq!(controller.snapshot().query.search, "");

    sleep(Duration::from_millis(399)).await;
    let searches = |controller: &Controller| {
        controller
            .client()
            .list_requests_at()
            .into_iter()
            .filter(|(_, request)| request.is_search())
            .collect::<Vec<_>>()
    };
    assert!(searches(&controller).is_empty());

    sleep(Duration::from_millis(2)).await;
    let fired = searches(&controller);
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].0 - start, Duration::from_millis(800));
    assert_eq!(
        fired[0].1,
        CollectionRequest::Search {
            text: "acme".to_string()
        }
    );
    assert_eq!(names(&controller), vec!["Acme Corp", "Acme2"]);
}

#[tokio::test(start_paused = true)]
async fn test_configured_debounce_delay() {
    let options = ControllerOptions::new(12).with_debounce(Duration::from_millis(200));
    let controller = ListSyncController::new(InMemoryCollection::new(acme_dataset()), options);
    controller.mount().await;

    let start = Instant::now();
    controller.set_search_text("beta");
    sleep(Duration::from_millis(199)).await;
    assert!(
        !controller
            .client()
            .list_requests()
            .iter()
            .any(CollectionRequest::is_search)
    );

    sleep(Duration::from_millis(2)).await;
    let fired: Vec<_> = controller
        .client()
        .list_requests_at()
        .into_iter()
        .filter(|(_, request)| request.is_search())
        .collect();
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].0 - start, Duration::from_millis(200));
    assert_eq!(names(&controller), vec!["Beta LLC"]);
}

#[tokio::test(start_paused = true)]
async fn test_clearing_search_cancels_pending_timer() {
    let controller = controller(acme_dataset());
    controller.mount().await;

    controller.set_search_text("acme");
    sleep(Duration::from_millis(200)).await;
    controller.set_search_text("");
    sleep(Duration::from_secs(2)).await;

    let requests = controller.client().list_requests();
    assert!(!requests.iter().any(CollectionRequest::is_search));
    assert_eq!(requests, vec![page(1), page(1)]);
}

#[tokio::test]
async fn test_page_clamp() {
    let controller = controller(departments(30));
    controller.mount().await;

    controller.go_to_page(999).await;
    assert_eq!(controller.snapshot().query.page, 3);
    assert_eq!(controller.client().list_requests().last(), Some(&page(3)));

    controller.go_to_page(0).await;
    assert_eq!(controller.snapshot().query.page, 1);
    assert_eq!(controller.client().list_requests().last(), Some(&page(1)));
}

#[tokio::test]
async fn test_same_page_does_not_refetch() {
    let controller = controller(departments(30));
    controller.mount().await;

    controller.go_to_page(1).await;
    assert_eq!(controller.client().list_requests().len(), 1);

    controller.refresh().await;
    assert_eq!(controller.client().list_requests().len(), 2);
}

#[tokio::test]
async fn test_missing_headers_fall_back_to_page_length() {
    let backend = InMemoryCollection::new(departments(5)).expose_headers(false);
    let controller = ListSyncController::new(backend, ControllerOptions::new(12));
    controller.mount().await;

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.status, LoadStatus::Ready);
    assert_eq!(snapshot.page.total_count, 5);
    assert_eq!(snapshot.page.total_pages, 1);
    assert_eq!(snapshot.page.totals, TotalsOrigin::PageLength);
}

#[tokio::test]
async fn test_create_resets_query_and_fetches_once() {
    let controller = controller(departments(30));
    controller.mount().await;
    controller.go_to_page(2).await;
    controller.set_search_text("Department 2");
    controller.submit_search_immediately().await;

    let before = controller.client().list_requests().len();
    let created = controller.create(draft("X")).await.unwrap();
    assert_eq!(created.id, RecordId::from(31));

    let requests = controller.client().list_requests();
    assert_eq!(requests.len(), before + 1);
    assert_eq!(requests.last(), Some(&page(1)));

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.query.search, "");
    assert_eq!(snapshot.pending_search, "");
    assert_eq!(snapshot.query.page, 1);
    assert_eq!(snapshot.page.total_count, 31);
    assert_eq!(snapshot.mutation_error, None);
}

#[tokio::test]
async fn test_invalid_draft_never_reaches_server() {
    let controller = controller(departments(3));
    controller.mount().await;

    let err = controller.create(draft("   ")).await.unwrap_err();
    assert!(err.is_validation());

    assert!(!controller.client().calls().contains(&Call::Create));
    assert_eq!(controller.client().list_requests().len(), 1);
    assert_eq!(
        controller.snapshot().mutation_error.as_deref(),
        Some("name: Name is required")
    );
}

#[tokio::test]
async fn test_failed_mutation_leaves_state_unchanged() {
    let controller = controller(departments(30));
    controller.mount().await;
    controller.go_to_page(2).await;
    let before = controller.snapshot();

    controller.client().fail_next(StewardError::Server {
        status: 500,
        message: "Database unavailable".to_string(),
    });
    let result = controller.update(&RecordId::from(13), draft("Renamed")).await;
    assert!(result.is_err());

    let after = controller.snapshot();
    assert_eq!(after.query, before.query);
    assert_eq!(after.page, before.page);
    assert_eq!(after.status, LoadStatus::Ready);
    assert_eq!(after.mutation_error.as_deref(), Some("Database unavailable"));
    assert_eq!(controller.client().list_requests().len(), 2);
}

#[tokio::test]
async fn test_update_restores_scroll_after_refresh() {
    let scroll = Arc::new(ScrollOffset::new(240));
    let controller =
        ListSyncController::builder(InMemoryCollection::new(departments(30)), ControllerOptions::new(12))
            .scroll(scroll.clone())
            .build();
    controller.mount().await;

    controller
        .update(&RecordId::from(2), draft("Finance"))
        .await
        .unwrap();

    assert_eq!(scroll.restores(), 1);
    assert_eq!(scroll.offset(), 240);
    assert_eq!(names(&controller)[1], "Finance");
    assert_eq!(controller.client().list_requests().len(), 2);
}

#[tokio::test]
async fn test_failed_update_does_not_restore_scroll() {
    let scroll = Arc::new(ScrollOffset::new(80));
    let controller =
        ListSyncController::builder(InMemoryCollection::new(departments(3)), ControllerOptions::new(12))
            .scroll(scroll.clone())
            .build();
    controller.mount().await;

    let err = controller
        .update(&RecordId::from(99), draft("Ghost"))
        .await
        .unwrap_err();

    assert!(matches!(err, StewardError::NotFound(_)));
    assert_eq!(scroll.restores(), 0);
}

#[tokio::test]
async fn test_remove_steps_back_from_emptied_last_page() {
    let controller = controller(departments(25));
    controller.mount().await;
    controller.go_to_page(3).await;
    assert!(controller.toggle_expanded(&RecordId::from(25)));

    controller.remove(&RecordId::from(25)).await.unwrap();

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.query.page, 2);
    assert_eq!(snapshot.page.total_pages, 2);
    assert_eq!(snapshot.page.items.len(), 12);
    assert!(snapshot.expanded.is_empty());
    assert_eq!(
        controller.client().list_requests(),
        vec![page(1), page(3), page(3), page(2)]
    );
}

#[tokio::test]
async fn test_navigation_seeds_and_syncs() {
    let navigation = Arc::new(MemoryNavigation::new("?page=2"));
    let controller =
        ListSyncController::builder(InMemoryCollection::new(departments(30)), ControllerOptions::new(12))
            .navigation(navigation.clone())
            .build();

    controller.mount().await;
    assert_eq!(controller.client().list_requests(), vec![page(2)]);
    assert_eq!(navigation.writes(), 0);

    controller.go_to_page(3).await;
    assert_eq!(navigation.current(), "page=3");
    assert_eq!(navigation.writes(), 1);

    controller.refresh().await;
    assert_eq!(navigation.writes(), 1);

    controller.set_search_text("acme corp");
    controller.submit_search_immediately().await;
    assert_eq!(navigation.current(), "search=acme+corp");
}

#[tokio::test]
async fn test_navigation_seeded_search() {
    let navigation = Arc::new(MemoryNavigation::new("page=5&search=acme"));
    let controller =
        ListSyncController::builder(InMemoryCollection::new(acme_dataset()), ControllerOptions::new(12))
            .navigation(navigation.clone())
            .build();

    let seeded = controller.snapshot();
    assert_eq!(seeded.query.page, 1);
    assert_eq!(seeded.pending_search, "acme");

    controller.mount().await;
    assert_eq!(names(&controller), vec!["Acme Corp", "Acme2"]);
    assert_eq!(navigation.current(), "search=acme");
}

#[tokio::test]
async fn test_stale_bookmark_steps_back() {
    let navigation = Arc::new(MemoryNavigation::new("page=9"));
    let controller =
        ListSyncController::builder(InMemoryCollection::new(departments(30)), ControllerOptions::new(12))
            .navigation(navigation.clone())
            .build();

    controller.mount().await;

    assert_eq!(controller.client().list_requests(), vec![page(9), page(3)]);
    assert_eq!(controller.snapshot().query.page, 3);
    assert_eq!(navigation.current(), "page=3");
}

#[tokio::test]
async fn test_bookmark_kept_without_pagination_headers() {
    let navigation = Arc::new(MemoryNavigation::new("page=2"));
    let backend = InMemoryCollection::new(departments(30)).expose_headers(false);
    let controller = ListSyncController::builder(backend, ControllerOptions::new(12))
        .navigation(navigation.clone())
        .build();

    controller.mount().await;

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.query.page, 2);
    assert_eq!(snapshot.page.items.len(), 12);
    assert_eq!(snapshot.page.items[0].name, "Department 13");
    assert_eq!(snapshot.page.totals, TotalsOrigin::PageLength);
    assert_eq!(controller.client().list_requests(), vec![page(2)]);
    assert_eq!(navigation.current(), "page=2");
    assert_eq!(navigation.writes(), 0);
}

#[tokio::test]
async fn test_remove_without_pagination_headers_stays_on_page() {
    let navigation = Arc::new(MemoryNavigation::new("page=2"));
    let backend = InMemoryCollection::new(departments(30)).expose_headers(false);
    let controller = ListSyncController::builder(backend, ControllerOptions::new(12))
        .navigation(navigation.clone())
        .build();
    controller.mount().await;

    controller.remove(&RecordId::from(13)).await.unwrap();

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.query.page, 2);
    assert_eq!(snapshot.page.items.len(), 12);
    assert_eq!(snapshot.page.items[0].name, "Department 14");
    assert_eq!(controller.client().list_requests(), vec![page(2), page(2)]);
    assert_eq!(navigation.current(), "page=2");
}

#[tokio::test]
async fn test_committed_search_collapses_rows() {
    let controller = controller(acme_dataset());
    controller.mount().await;

    assert!(controller.toggle_expanded(&RecordId::from(1)));
    assert!(controller.snapshot().expanded.contains(&RecordId::from(1)));

    controller.set_search_text("beta");
    assert!(!controller.snapshot().expanded.is_empty());

    controller.submit_search_immediately().await;
    assert!(controller.snapshot().expanded.is_empty());
}

#[tokio::test]
async fn test_fetch_failure_keeps_previous_page() {
    let controller = controller(departments(30));
    controller.mount().await;

    controller
        .client()
        .fail_next(StewardError::Transport("connection refused".to_string()));
    controller.refresh().await;

    let snapshot = controller.snapshot();
    assert_eq!(
        snapshot.status,
        LoadStatus::Failed("connection refused".to_string())
    );
    assert_eq!(snapshot.page.items.len(), 12);

    controller.refresh().await;
    assert_eq!(controller.snapshot().status, LoadStatus::Ready);
}

#[tokio::test(start_paused = true)]
async fn test_request_timeout_is_a_failure() {
    let backend =
        InMemoryCollection::new(departments(3)).with_list_latency(|_| Duration::from_secs(60));
    let options = ControllerOptions::new(12).with_request_timeout(Duration::from_secs(5));
    let controller = ListSyncController::new(backend, options);

    controller.mount().await;

    assert_eq!(
        controller.snapshot().status,
        LoadStatus::Failed("request timed out after 5s".to_string())
    );
}

#[tokio::test]
async fn test_subscribers_see_settled_snapshot() {
    let controller = controller(departments(4));
    let mut updates = controller.subscribe();
    assert_eq!(updates.borrow().status, LoadStatus::Idle);

    controller.mount().await;

    assert!(updates.has_changed().unwrap());
    let latest = updates.borrow_and_update();
    assert_eq!(latest.status, LoadStatus::Ready);
    assert_eq!(latest.page.items.len(), 4);
}

#[test]
fn test_fetch_outcome_from_error() {
    let mut fields = crate::validation::FieldErrors::new();
    fields.add("email", "Email is required");

    assert!(matches!(
        FetchOutcome::<Department>::from_error(StewardError::Validation(fields)),
        FetchOutcome::ValidationFailed(_)
    ));
    match FetchOutcome::<Department>::from_error(StewardError::NotFound(String::new())) {
        FetchOutcome::Failed(message) => assert_eq!(message, crate::error::GENERIC_FAILURE),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn test_kind_follows_record_type() {
    let controller = controller(Vec::new());
    assert_eq!(controller.kind(), Department::KIND);
    assert_eq!(controller.options().page_size, 12);
}
