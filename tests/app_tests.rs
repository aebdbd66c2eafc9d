mod common;

use common::{TempDb, cheap_params};
use stockroom::App;
use stockroom::config::Config;
use stockroom::preferences::SmsPermission;

fn test_config(tmp: &TempDb) -> Config {
    let mut cfg = Config::default();
    cfg.database = tmp.config();
    cfg.password = cheap_params();
    cfg.basic.preferences_path = tmp.path().with_extension("prefs.json");
    cfg
}

#[tokio::test]
async fn bootstrap_wires_store_credentials_and_preferences() {
    let tmp = TempDb::new("app");
    let cfg = test_config(&tmp);
    let prefs_path = cfg.basic.preferences_path.clone();

    let mut app = App::bootstrap(cfg).await.expect("bootstrap");

    assert!(app.credentials().register("bob", "secret").await);
    assert!(app.credentials().login("BOB", "secret").await);

    let mut inventory = app.inventory().await;
    assert!(inventory.is_empty());
    assert!(inventory.add_item("Widget", 5).await);

    // a second controller sees what the first one wrote
    let other = app.inventory().await;
    assert_eq!(other.items(), inventory.items());

    assert!(!app.preferences().receive_notifications());
    let enabled = app
        .preferences_mut()
        .toggle(true, SmsPermission::Granted)
        .expect("save preference");
    assert!(enabled);

    app.shutdown().await;
    let _ = std::fs::remove_file(&prefs_path);
}

#[tokio::test]
async fn corrupt_preferences_fall_back_to_defaults() {
    let tmp = TempDb::new("app-badprefs");
    let cfg = test_config(&tmp);
    let prefs_path = cfg.basic.preferences_path.clone();
    std::fs::write(&prefs_path, "").expect("write prefs");

    let mut app = App::bootstrap(cfg).await.expect("bootstrap with corrupt prefs");
    assert_eq!(app.preferences().path(), prefs_path.as_path());
    assert!(!app.preferences().receive_notifications());

    assert!(app.preferences_mut().on_permission_result(true).expect("save preference"));
    let raw = std::fs::read_to_string(&prefs_path).expect("read prefs");
    assert!(raw.contains(r#""pref_receive_notifications": true"#));

    app.shutdown().await;
    let _ = std::fs::remove_file(&prefs_path);
}

#[tokio::test]
async fn bootstrap_reports_schema_errors() {
    let tmp = TempDb::new("app-schema");
    let mut newer = test_config(&tmp);
    newer.database.schema_version += 1;
    let prefs_path = newer.basic.preferences_path.clone();
    App::bootstrap(newer).await.expect("bootstrap newer").shutdown().await;

    let err = match App::bootstrap(test_config(&tmp)).await {
        Ok(_) => panic!("older code opened a newer database"),
        Err(e) => e,
    };
    assert!(err.is_schema_error());
    let _ = std::fs::remove_file(&prefs_path);
}
