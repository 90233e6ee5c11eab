use navstack::{
    AlertButton, AlertOptions, App, Blank, Config, Headless, NavError, NavOptions, Params,
    Registry, Settled,
};
use parking_lot::Mutex;
use std::sync::Arc;

fn app() -> App {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut registry = Registry::new();
    registry
        .register_default::<Blank>("root")
        .register_default::<Blank>("detail");
    App::headless(registry, Config::default())
}

type Dismissals = Arc<Mutex<Vec<Option<String>>>>;

fn record_dismissals(options: AlertOptions, dismissals: &Dismissals) -> AlertOptions {
    let dismissals = Arc::clone(dismissals);
    options.on_dismiss(move |role| dismissals.lock().push(role.map(String::from)))
}

#[test]
fn buttons_dismiss_with_their_role() {
    let mut app = app();
    let dismissals = Dismissals::default();
    let options = AlertOptions::new()
        .title("Discard draft?")
        .button(AlertButton::new("Cancel").with_role("cancel"))
        .button("Discard");
    let mut alert = app
        .alert_controller()
        .create(record_dismissals(options, &dismissals));

    let mut presented = alert.present(NavOptions::default()).unwrap();
    assert!(app.poll());
    assert_eq!(presented.try_settled(), Some(Ok(Settled::Transitioned)));
    assert_eq!(app.portal().len(), 1);

    let mut dismissed = app.click_alert_button(alert.id(), 0).unwrap().unwrap();
    assert_eq!(dismissed.try_settled(), Some(Ok(Settled::Transitioned)));
    assert!(app.portal().is_empty());
    assert_eq!(*dismissals.lock(), [Some("cancel".to_string())]);
}

#[test]
fn handlers_can_dismiss_then_pop() {
    let mut app = app();
    let mut nav = app.create_nav("root", Params::new(), Headless).unwrap();
    nav.push("detail", Params::new(), NavOptions::default()).unwrap();
    assert_eq!(nav.len(), 2);

    let dismissals = Dismissals::default();
    let page_nav = nav.handle();
    let options = AlertOptions::new()
        .message("Leave this page?")
        .button(AlertButton::new("Leave").with_handler(move |alert| {
            alert.dismiss();
            page_nav.pop(NavOptions::default());
            false
        }));
    let mut alert = app
        .alert_controller()
        .create(record_dismissals(options, &dismissals));
    alert.present(NavOptions::default()).unwrap();
    app.poll();

    let outcome = app.click_alert_button(alert.id(), 0).unwrap();
    assert!(outcome.is_none(), "the handler asked to handle dismissal itself");
    assert!(app.portal().is_empty());
    assert_eq!(*dismissals.lock(), [None]);

    assert_eq!(nav.len(), 2, "the pop waits for the outlet to be polled");
    nav.poll();
    assert_eq!(nav.len(), 1);
    assert_eq!(nav.active().unwrap().name(), "root");
}

#[test]
fn staying_keeps_the_alert_open() {
    let mut app = app();
    let clicks = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&clicks);
    let mut alert = app.alert_controller().create(AlertOptions::new().button(
        AlertButton::new("Again").with_handler(move |_| {
            *counter.lock() += 1;
            false
        }),
    ));
    alert.present(NavOptions::default()).unwrap();
    app.poll();

    for _ in 0..3 {
        assert!(app.click_alert_button(alert.id(), 0).unwrap().is_none());
    }
    assert_eq!(*clicks.lock(), 3);
    assert_eq!(app.portal().len(), 1);
}

#[test]
fn panicking_handlers_still_dismiss() {
    let mut app = app();
    let mut alert = app.alert_controller().create(
        AlertOptions::new().button(AlertButton::new("Boom").with_handler(|_| -> bool {
            panic!("handler exploded")
        })),
    );
    alert.present(NavOptions::default()).unwrap();
    app.poll();

    let completion = app.click_alert_button(alert.id(), 0).unwrap();
    assert!(completion.is_some());
    assert!(app.portal().is_empty());
}

#[test]
fn presenting_and_dismissing_twice() {
    let mut app = app();
    let mut alert = app.alert_controller().create(AlertOptions::new().title("Hi"));

    let mut early = alert.dismiss();
    assert_eq!(early.try_settled(), Some(Ok(Settled::Unchanged)));

    alert.present(NavOptions::default()).unwrap();
    assert_eq!(
        alert.present(NavOptions::default()).unwrap_err(),
        NavError::AlreadyPresented(alert.id())
    );
    app.poll();
    assert!(alert.is_presented());

    let mut first = alert.dismiss();
    let mut second = alert.dismiss();
    app.poll();
    assert_eq!(first.try_settled(), Some(Ok(Settled::Transitioned)));
    assert_eq!(second.try_settled(), Some(Ok(Settled::Unchanged)));
    assert!(app.portal().is_empty());
}

#[test]
fn clicking_unknown_alerts_and_buttons_fails() {
    let mut app = app();
    let mut alert = app
        .alert_controller()
        .create(AlertOptions::new().button("OK"));

    assert_eq!(
        app.click_alert_button(alert.id(), 0).unwrap_err(),
        NavError::UnknownView(alert.id())
    );

    alert.present(NavOptions::default()).unwrap();
    app.poll();
    assert_eq!(
        app.click_alert_button(alert.id(), 3).unwrap_err(),
        NavError::IndexOutOfBounds { index: 3, len: 1 }
    );
    assert_eq!(app.portal().len(), 1);
}

#[test]
fn alerts_stack_on_the_portal() {
    let mut app = app();
    let alerts = app.alert_controller();
    let mut first = alerts.create(AlertOptions::new().title("first"));
    let mut second = alerts.create(AlertOptions::new().title("second"));
    first.present(NavOptions::default()).unwrap();
    second.present(NavOptions::default()).unwrap();
    app.poll();
    assert_eq!(app.portal().len(), 2);
    assert_eq!(app.portal().active().map(|view| view.id()), Some(second.id()));

    // only the top alert can be dismissed
    let mut blocked = first.dismiss();
    app.poll();
    assert_eq!(blocked.try_settled(), Some(Ok(Settled::Unchanged)));
    assert_eq!(app.portal().len(), 2);

    second.dismiss();
    first.dismiss();
    app.poll();
    assert!(app.portal().is_empty());
}

#[test]
fn covered_alerts_can_still_be_dismissed_later() {
    let mut app = app();
    let mut nav = app.create_nav("root", Params::new(), Headless).unwrap();
    let dismissals = Dismissals::default();
    let alerts = app.alert_controller();
    let mut lower = alerts.create(record_dismissals(
        AlertOptions::new().button(AlertButton::new("OK").with_role("confirm")),
        &dismissals,
    ));
    let mut upper = alerts.create(AlertOptions::new().button("Close"));
    lower.present(NavOptions::default()).unwrap();
    upper.present(NavOptions::default()).unwrap();
    app.poll();
    assert_eq!(app.portal().len(), 2);

    // the upper alert is in the way, so this click can't take the lower one off
    let mut blocked = app.click_alert_button(lower.id(), 0).unwrap().unwrap();
    assert_eq!(blocked.try_settled(), Some(Ok(Settled::Unchanged)));
    assert_eq!(app.portal().len(), 2);

    app.click_alert_button(upper.id(), 0).unwrap();
    assert_eq!(app.portal().len(), 1);
    assert!(dismissals.lock().is_empty());

    let mut dismissed = app.click_alert_button(lower.id(), 0).unwrap().unwrap();
    assert_eq!(dismissed.try_settled(), Some(Ok(Settled::Transitioned)));
    assert!(app.portal().is_empty());
    assert_eq!(*dismissals.lock(), [Some("confirm".to_string())]);
    assert_eq!(nav.len(), 1);

    // the back button reaches a previously blocked alert too
    let mut again = alerts.create(AlertOptions::new().button("OK"));
    let mut cover = alerts.create(AlertOptions::new());
    again.present(NavOptions::default()).unwrap();
    cover.present(NavOptions::default()).unwrap();
    app.poll();
    app.tap_alert_backdrop(again.id()).unwrap();
    assert!(app.handle_back_button(&mut nav));
    assert!(app.handle_back_button(&mut nav));
    assert!(app.portal().is_empty());
}
