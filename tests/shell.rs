use cgmath::{Point2, Vector2};
use navstack::{
    impl_page, AlertOptions, App, Blank, Config, Content, Headless, HookResult, LifecycleState,
    NavError, NavOptions, Params, Rect, Registry, Tabs,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

type Log = Arc<Mutex<Vec<String>>>;

#[derive(Debug)]
struct Recorder {
    name: String,
    log: Log,
}

impl Recorder {
    fn record(&self, hook: &str) -> HookResult {
        self.log.lock().push(format!("{}.{}", self.name, hook));
        Ok(())
    }
}

impl_page! {
    Recorder;
    fn will_enter(&mut self) -> HookResult {
        self.record("will_enter")
    }
    fn did_enter(&mut self) -> HookResult {
        self.record("did_enter")
    }
    fn will_leave(&mut self) -> HookResult {
        self.record("will_leave")
    }
    fn did_leave(&mut self) -> HookResult {
        self.record("did_leave")
    }
}

fn app_with(log: &Log, config: Config) -> App {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut registry = Registry::new();
    let log = Arc::clone(log);
    registry.register("page", move |context| {
        Ok(Recorder {
            name: context.params.get("name").unwrap_or("page").to_string(),
            log: Arc::clone(&log),
        })
    });
    registry.register_default::<Blank>("blank");
    App::headless(registry, config)
}

fn named(name: &str) -> Params {
    Params::new().with("name", name)
}

fn take(log: &Log) -> Vec<String> {
    log.lock().drain(..).collect()
}

#[test]
fn back_button_prefers_overlays() {
    let log = Log::default();
    let mut app = app_with(&log, Config::default());
    let mut nav = app.create_nav("blank", Params::new(), Headless).unwrap();
    nav.push("blank", Params::new(), NavOptions::default()).unwrap();

    let mut alert = app.alert_controller().create(AlertOptions::new().button("OK"));
    alert.present(NavOptions::default()).unwrap();
    app.poll();

    assert!(app.handle_back_button(&mut nav));
    assert!(app.portal().is_empty());
    assert_eq!(nav.len(), 2, "the page stack is untouched while an overlay is up");

    assert!(app.handle_back_button(&mut nav));
    assert_eq!(nav.len(), 1);

    assert!(!app.handle_back_button(&mut nav), "nothing to go back to");
    assert_eq!(nav.len(), 1);
}

#[test]
fn blocking_overlays_swallow_the_back_button() {
    let log = Log::default();
    let mut app = app_with(&log, Config::default());
    let mut nav = app.create_nav("blank", Params::new(), Headless).unwrap();
    nav.push("blank", Params::new(), NavOptions::default()).unwrap();

    let mut alert = app
        .alert_controller()
        .create(AlertOptions::new().button("OK").backdrop_dismiss(false));
    alert.present(NavOptions::default()).unwrap();
    app.poll();

    assert!(!app.handle_back_button(&mut nav));
    assert_eq!(app.portal().len(), 1);
    assert_eq!(nav.len(), 2);

    assert!(app.tap_alert_backdrop(alert.id()).unwrap().is_none());
    assert_eq!(app.portal().len(), 1);
}

#[test]
fn back_button_can_skip_overlays() {
    let log = Log::default();
    let config = Config {
        back_button_dismisses_overlay: false,
        ..Config::default()
    };
    let mut app = app_with(&log, config);
    let mut nav = app.create_nav("blank", Params::new(), Headless).unwrap();
    nav.push("blank", Params::new(), NavOptions::default()).unwrap();

    let mut alert = app.alert_controller().create(AlertOptions::new());
    alert.present(NavOptions::default()).unwrap();
    app.poll();

    assert!(app.handle_back_button(&mut nav));
    assert_eq!(app.portal().len(), 1);
    assert_eq!(nav.len(), 1);
}

#[test]
fn switching_tabs_moves_lifecycle_between_stacks() {
    let log = Log::default();
    let app = app_with(&log, Config::default());
    let mut tabs = Tabs::new();
    tabs.add("Home", app.create_nav("page", named("home"), Headless).unwrap());
    tabs.add("Search", app.create_nav("page", named("search"), Headless).unwrap());
    assert_eq!(
        take(&log),
        [
            "home.will_enter",
            "home.did_enter",
            "search.will_enter",
            "search.did_enter",
            "search.will_leave",
            "search.did_leave",
        ]
    );
    assert_eq!(tabs.selected(), Some(0));
    assert_eq!(tabs.len(), 2);

    tabs.select(1).unwrap();
    assert_eq!(
        take(&log),
        [
            "home.will_leave",
            "search.will_enter",
            "search.did_enter",
            "home.did_leave",
        ]
    );
    assert_eq!(tabs.selected_tab().map(|tab| tab.title()), Some("Search"));
    let search = tabs.get(1).unwrap().nav().active().unwrap();
    assert_eq!(search.state(), LifecycleState::Active);

    tabs.select(1).unwrap();
    assert!(take(&log).is_empty(), "reselecting does nothing");

    assert_eq!(
        tabs.select(2).unwrap_err(),
        NavError::IndexOutOfBounds { index: 2, len: 2 }
    );
    assert_eq!(tabs.selected(), Some(1));
}

#[test]
fn tabs_keep_their_own_stacks() {
    let log = Log::default();
    let app = app_with(&log, Config::default());
    let mut tabs = Tabs::new();
    tabs.add("Home", app.create_nav("blank", Params::new(), Headless).unwrap());
    tabs.add("Search", app.create_nav("blank", Params::new(), Headless).unwrap());

    let home = tabs.selected_tab_mut().unwrap().nav().handle();
    home.push("blank", Params::new(), NavOptions::default()).unwrap();
    assert!(tabs.poll());
    assert_eq!(tabs.get(0).unwrap().nav().len(), 2);
    assert_eq!(tabs.get(1).unwrap().nav().len(), 1);
}

#[test]
fn pages_share_content_with_their_view_controller() {
    let log = Log::default();
    let app = app_with(&log, Config::default());
    let mut nav = app.create_nav("blank", Params::new(), Headless).unwrap();

    let content = Content::new(
        Rect::new(Point2::new(0., 0.), Vector2::new(375., 600.)),
        Vector2::new(375., 1800.),
    )
    .into_ref();
    let view = nav.active_mut().unwrap();
    assert!(view.set_content(Arc::clone(&content)));
    assert!(!view.set_content(Arc::clone(&content)));

    view.content()
        .unwrap()
        .lock()
        .scroll_to_bottom(Duration::from_secs(0));
    let dims = content.lock().content_dimensions();
    assert_eq!(dims.scroll_top, 1200.);
    assert_eq!(dims.content_height, 600.);
}
