use super::*;
use crate::config::{persist_items, read_settings_file};
use serial_test::serial;
use std::{
    env, io,
    time::{SystemTime, UNIX_EPOCH},
};

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.lock())
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

async fn fresh_inventory(initial_items: &[&str]) -> (Arc<Facade>, SharedBuffer) {
    Facade::dispose().await;
    let settings = Settings {
        inventory_name: "pantry".into(),
        initial_items: initial_items.iter().map(|s| s.to_string()).collect(),
        ..Settings::default()
    };
    let buffer = SharedBuffer::default();
    let facade = Facade::get_instance();
    startup(
        &facade,
        &settings,
        Arc::new(ConsoleMediator::new(Box::new(buffer.clone()))),
    );
    (facade, buffer)
}

fn pantry(facade: &Facade) -> Value {
    facade
        .retrieve_proxy("pantry")
        .and_then(|proxy| proxy.data())
        .expect("pantry data")
}

#[tokio::test]
#[serial]
async fn startup_registers_every_member() {
    let (facade, _) = fresh_inventory(&["rice"]).await;

    assert!(facade.has_proxy("pantry"));
    assert!(facade.has_mediator(ConsoleMediator::NAME));
    for action in [
        InventoryAction::Add,
        InventoryAction::Remove,
        InventoryAction::Clear,
        InventoryAction::List,
    ] {
        assert!(facade.has_command(action.notification_name()));
    }
    assert_eq!(pantry(&facade), json!(["rice"]));

    Facade::dispose().await;
}

#[tokio::test]
#[serial]
async fn add_appends_new_items_and_rejects_duplicates() {
    let (facade, buffer) = fresh_inventory(&["rice"]).await;

    facade
        .send_notification(ADD_ITEMS, Some(Body::new(json!(["beans", "rice"]))), None)
        .await
        .expect("add");

    assert_eq!(pantry(&facade), json!(["rice", "beans"]));
    assert_eq!(
        buffer.lines(),
        vec![
            "rejected rice (duplicate)",
            "[add] 2 item(s): rice, beans",
        ]
    );

    Facade::dispose().await;
}

#[tokio::test]
#[serial]
async fn remove_accepts_a_single_string() {
    let (facade, buffer) = fresh_inventory(&["rice", "beans"]).await;

    facade
        .send_notification(REMOVE_ITEM, Some(Body::new(json!("rice"))), None)
        .await
        .expect("remove rice");
    facade
        .send_notification(REMOVE_ITEM, Some(Body::new(json!("salt"))), None)
        .await
        .expect("remove salt");

    assert_eq!(pantry(&facade), json!(["beans"]));
    assert_eq!(
        buffer.lines(),
        vec![
            "[remove] 1 item(s): beans",
            "rejected salt (missing)",
            "[remove] 1 item(s): beans",
        ]
    );

    Facade::dispose().await;
}

#[tokio::test]
#[serial]
async fn clear_then_list_reports_empty_inventory() {
    let (facade, buffer) = fresh_inventory(&["rice", "beans"]).await;

    facade
        .send_notification(CLEAR_ITEMS, None, None)
        .await
        .expect("clear");
    facade
        .send_notification(LIST_ITEMS, None, None)
        .await
        .expect("list");

    assert_eq!(pantry(&facade), json!([]));
    assert_eq!(
        buffer.lines(),
        vec!["[clear] inventory is empty", "[list] inventory is empty"]
    );

    Facade::dispose().await;
}

#[tokio::test]
#[serial]
async fn add_without_body_fails_before_touching_the_proxy() {
    let (facade, buffer) = fresh_inventory(&["rice"]).await;

    let err = facade
        .send_notification(ADD_ITEMS, None, None)
        .await
        .expect_err("missing body");

    assert_eq!(err.to_string(), "AddItems requires a body");
    assert_eq!(pantry(&facade), json!(["rice"]));
    assert!(buffer.lines().is_empty());

    Facade::dispose().await;
}

#[tokio::test]
#[serial]
async fn commands_fail_when_proxy_is_gone() {
    let (facade, _) = fresh_inventory(&[]).await;
    facade.remove_proxy("pantry");

    let err = facade
        .send_notification(LIST_ITEMS, None, None)
        .await
        .expect_err("proxy missing");
    assert_eq!(err.to_string(), "inventory proxy 'pantry' is not registered");

    Facade::dispose().await;
}

#[tokio::test]
#[serial]
async fn persisted_add_is_seen_by_the_next_run() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("mvc_demo_inventory_{suffix}.toml"));

    let (facade, _) = fresh_inventory(&["rice"]).await;
    facade
        .send_notification(ADD_ITEMS, Some(Body::new(json!(["salt"]))), None)
        .await
        .expect("add");
    let items = current_items(&facade, "pantry").expect("items");
    persist_items(&path, &items).expect("persist");

    let saved = read_settings_file(&path).expect("reload");
    let saved_items: Vec<&str> = saved.initial_items.iter().map(String::as_str).collect();
    let (facade, buffer) = fresh_inventory(&saved_items).await;
    facade
        .send_notification(LIST_ITEMS, None, None)
        .await
        .expect("list");
    assert_eq!(buffer.lines(), vec!["[list] 2 item(s): rice, salt"]);

    Facade::dispose().await;
    std::fs::remove_file(path).expect("cleanup");
}

#[test]
fn only_list_leaves_the_inventory_untouched() {
    assert!(!InventoryAction::List.mutates());
    assert!(InventoryAction::Add.mutates());
    assert!(InventoryAction::Remove.mutates());
    assert!(InventoryAction::Clear.mutates());
}

#[test]
fn render_formats_rejections_and_listings() {
    let rejected = Notification::new(ITEM_REJECTED)
        .with_body(json!("salt"))
        .with_type("missing");
    assert_eq!(ConsoleMediator::render(&rejected), "rejected salt (missing)");

    let listing = Notification::new(INVENTORY_CHANGED).with_body(json!(["a", "b"]));
    assert_eq!(ConsoleMediator::render(&listing), "[-] 2 item(s): a, b");
}
