//! End-to-end storefront flows against the in-memory browser boundaries.
//!
//! Clicks go through the same path as in the browser: a `PageClick` is
//! classified and emitted on the `EventBus`, the subscribed queue hands the
//! event to `ViewRouter::dispatch`.

use std::cell::RefCell;
use std::rc::Rc;

use heedless_core::mock::{
    FetchCall, MemoryStore, MockFetcher, RecordingHistory, RecordingSurface, collection, product,
};
use heedless_core::{
    CatalogCache, CatalogHandle, EventBus, FetchError, HistoryEntry, NavOutcome, PageClick,
    PageEvent, ProductEntity, ViewRouter, ViewState,
};

type Router = ViewRouter<MockFetcher, MemoryStore, RecordingHistory, RecordingSurface>;

struct Page {
    router: Router,
    bus: EventBus,
    queue: Rc<RefCell<Vec<PageEvent>>>,
}

impl Page {
    fn open(url: &str, store: MemoryStore) -> Self {
        let router = ViewRouter::new(
            storefront(),
            CatalogCache::load(store),
            RecordingHistory::new(url),
            RecordingSurface::default(),
        );
        let bus = EventBus::new();
        let queue = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&queue);
        bus.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        Self { router, bus, queue }
    }

    async fn click(&self, marker: &str, handle: Option<&str>) -> Vec<NavOutcome> {
        self.bus.dispatch_click(&PageClick {
            marker: Some(marker.to_string()),
            handle: handle.map(str::to_string),
            variant_id: handle.map(|h| format!("gid://shopify/ProductVariant/{h}")),
        });
        self.drain().await
    }

    async fn back(&self) -> Vec<NavOutcome> {
        assert!(self.router.history().back());
        self.bus.emit(&PageEvent::HistoryPopped);
        self.drain().await
    }

    async fn drain(&self) -> Vec<NavOutcome> {
        let events: Vec<PageEvent> = self.queue.borrow_mut().drain(..).collect();
        let mut outcomes = Vec::new();
        for event in events {
            outcomes.push(self.router.dispatch(event).await.unwrap());
        }
        outcomes
    }
}

fn storefront() -> MockFetcher {
    MockFetcher::new()
        .with_collection(collection(
            "frontpage",
            &[
                ("hat-01", "Hat"),
                ("blue-shirt", "Blue Shirt"),
                ("scarf", "Scarf"),
                ("boots", "Boots"),
                ("gloves", "Gloves"),
            ],
        ))
        .with_product(product("hat-01", "Hat"))
        .with_product(product("blue-shirt", "Blue Shirt"))
        .with_product(product("scarf", "Scarf"))
}

fn handle(raw: &str) -> CatalogHandle {
    CatalogHandle::parse(raw).unwrap()
}

#[tokio::test]
async fn test_first_load() {
    let page = Page::open("/", MemoryStore::new());

    page.router.start().await.unwrap();

    assert_eq!(
        page.router.fetcher().calls(),
        vec![FetchCall::Collection {
            handle: "frontpage".to_string(),
            page_size: 5,
        }]
    );
    let homepage = page.router.surface().homepage_html().unwrap();
    assert_eq!(homepage.matches(r#"js-page="productCard""#).count(), 5);
    assert_eq!(page.router.state(), ViewState::Home);
    assert_eq!(page.router.history().len(), 1);
}

#[tokio::test]
async fn test_card_click_opens_product() {
    let page = Page::open("/", MemoryStore::new());
    page.router.start().await.unwrap();

    let outcomes = page.click("viewProduct", Some("blue-shirt")).await;

    assert_eq!(
        outcomes,
        vec![NavOutcome::Rendered(ViewState::Product(handle("blue-shirt")))]
    );
    assert_eq!(page.router.fetcher().product_fetches("blue-shirt"), 1);
    assert!(page.router.surface().is_product_active());
    assert!(
        page.router
            .surface()
            .product_html()
            .unwrap()
            .contains("Blue&#32;Shirt")
    );
    assert_eq!(
        page.router.history().current(),
        HistoryEntry::new("Blue Shirt", "?product=blue-shirt")
    );
}

#[tokio::test]
async fn test_close_returns_home_without_fetching() {
    let page = Page::open("/", MemoryStore::new());
    page.router.start().await.unwrap();
    page.click("viewProduct", Some("blue-shirt")).await;

    let outcomes = page.click("closeProduct", None).await;

    assert_eq!(outcomes, vec![NavOutcome::Rendered(ViewState::Home)]);
    assert!(!page.router.surface().is_product_active());
    assert_eq!(page.router.history().current(), HistoryEntry::home());
    assert_eq!(page.router.fetcher().collection_fetches("frontpage"), 1);
}

#[tokio::test]
async fn test_reload_serves_from_storage() {
    let store = MemoryStore::new();
    {
        let page = Page::open("/", store.clone());
        page.router.start().await.unwrap();
        page.click("viewProduct", Some("hat-01")).await;
    }

    let reloaded = Page::open("/?product=hat-01", store);
    let outcome = reloaded.router.start().await.unwrap();

    assert_eq!(outcome, NavOutcome::Rendered(ViewState::Product(handle("hat-01"))));
    assert!(reloaded.router.fetcher().calls().is_empty());
    assert!(reloaded.router.surface().is_product_active());

    reloaded.click("closeProduct", None).await;
    assert!(reloaded.router.fetcher().calls().is_empty());
}

#[tokio::test]
async fn test_product_url_matches_clicked_state() {
    let clicked = Page::open("/", MemoryStore::new());
    clicked.router.start().await.unwrap();
    clicked.click("viewProduct", Some("scarf")).await;

    let direct = Page::open("/?product=scarf", MemoryStore::new());
    direct.router.start().await.unwrap();

    assert_eq!(clicked.router.state(), direct.router.state());
    assert_eq!(
        clicked.router.surface().product_html(),
        direct.router.surface().product_html()
    );
    assert_eq!(
        clicked.router.history().current(),
        direct.router.history().current()
    );
}

#[tokio::test]
async fn test_back_and_forward() {
    let page = Page::open("/", MemoryStore::new());
    page.router.start().await.unwrap();
    page.click("viewProduct", Some("hat-01")).await;
    page.click("closeProduct", None).await;
    page.click("viewProduct", Some("scarf")).await;
    let pushes = page.router.history().push_count();

    assert_eq!(
        page.back().await,
        vec![NavOutcome::Rendered(ViewState::Home)]
    );
    assert_eq!(
        page.back().await,
        vec![NavOutcome::Rendered(ViewState::Product(handle("hat-01")))]
    );

    assert!(page.router.history().forward());
    page.bus.emit(&PageEvent::HistoryPopped);
    page.drain().await;
    assert_eq!(page.router.state(), ViewState::Home);

    assert_eq!(page.router.history().push_count(), pushes);
    assert_eq!(page.router.fetcher().product_fetches("hat-01"), 1);
}

#[tokio::test]
async fn test_corrupt_storage_is_refetched() {
    let store = MemoryStore::new();
    store.insert_raw("collectionProducts", "not json at all");
    store.insert_raw("singleProducts", r#"{"hat-01": {"title": 3}}"#);

    let page = Page::open("/?product=hat-01", store.clone());
    page.router.start().await.unwrap();

    assert_eq!(page.router.fetcher().product_fetches("hat-01"), 1);
    assert!(page.router.cache().has::<ProductEntity>(&handle("hat-01")));
    let persisted = store.raw("singleProducts").unwrap();
    assert!(persisted.contains(r#""handle":"hat-01""#));
}

#[tokio::test]
async fn test_failed_click_keeps_view() {
    let page = Page::open("/", MemoryStore::new());
    page.router.start().await.unwrap();
    page.router
        .fetcher()
        .fail("scarf", FetchError::Http(503));

    let outcomes = page.click("viewProduct", Some("scarf")).await;

    assert_eq!(outcomes, vec![NavOutcome::Failed]);
    assert_eq!(page.router.state(), ViewState::Home);
    assert!(!page.router.surface().is_product_active());
    assert_eq!(page.router.history().len(), 1);
}

#[tokio::test]
async fn test_non_action_clicks_are_dropped() {
    let page = Page::open("/", MemoryStore::new());
    page.router.start().await.unwrap();

    assert!(page.click("productCard", Some("hat-01")).await.is_empty());
    assert!(page.click("viewProduct", Some("../etc")).await.is_empty());
    assert_eq!(
        page.click("addToCart", Some("hat-01")).await,
        vec![NavOutcome::Ignored]
    );
    assert_eq!(page.router.fetcher().calls().len(), 1);
}
