use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use configs::AppConfig;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

struct TestApp {
    base_url: String,
}

fn data_file() -> PathBuf {
    PathBuf::from(format!("target/test-data/{}/data.csv", Uuid::new_v4()))
}

async fn start_server(data_file: &Path) -> anyhow::Result<TestApp> {
    let mut cfg = AppConfig::default();
    cfg.storage.data_file = data_file.to_path_buf();
    cfg.normalize_and_validate()?;

    let app = server::startup::build_app(&cfg).await?;
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url })
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().build().expect("reqwest client")
}

async fn count(c: &reqwest::Client, app: &TestApp) -> anyhow::Result<u64> {
    let body = c.get(format!("{}/items/count", app.base_url)).send().await?.json::<Value>().await?;
    Ok(body["count"].as_u64().unwrap_or(u64::MAX))
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let file = data_file();
    let app = start_server(&file).await?;
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_item_lifecycle() -> anyhow::Result<()> {
    let file = data_file();
    let app = start_server(&file).await?;
    let c = client();

    assert_eq!(count(&c, &app).await?, 0);

    let anna = json!({"id": 1, "nome": "Anna", "cognome": "Bianchi", "codice_fiscale": "ABC123"});
    let res = c.post(format!("{}/items/", app.base_url)).json(&anna).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, anna);
    assert_eq!(count(&c, &app).await?, 1);

    let res = c.get(format!("{}/items/1", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, anna);

    // duplicate id leaves the table unchanged
    let res = c.post(format!("{}/items/", app.base_url)).json(&anna).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["detail"], "ID already exists");
    assert_eq!(count(&c, &app).await?, 1);

    let verdi = json!({"id": 1, "nome": "Anna", "cognome": "Verdi", "codice_fiscale": "ABC123"});
    let res = c.put(format!("{}/items/1", app.base_url)).json(&verdi).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let res = c.get(format!("{}/items/1", app.base_url)).send().await?;
    assert_eq!(res.json::<Value>().await?["cognome"], "Verdi");

    let res = c.delete(format!("{}/items/1", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({"message": "Item deleted successfully"}));
    assert_eq!(count(&c, &app).await?, 0);

    let res = c.get(format!("{}/items/1", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let res = c.put(format!("{}/items/1", app.base_url)).json(&verdi).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let res = c.delete(format!("{}/items/1", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_records_survive_restart() -> anyhow::Result<()> {
    let file = data_file();
    let app = start_server(&file).await?;
    let c = client();

    let records = vec![
        json!({"id": 7, "nome": "Carla", "cognome": "Russo", "codice_fiscale": "RSSCRL"}),
        json!({"id": 3, "nome": "Bruno", "cognome": "Neri, detto Bruno", "codice_fiscale": "NRIBRN"}),
        json!({"id": 5, "nome": "Anna", "cognome": "Bianchi", "codice_fiscale": "BNCNNA"}),
    ];
    for r in &records {
        let res = c.post(format!("{}/items/", app.base_url)).json(r).send().await?;
        assert_eq!(res.status(), HttpStatusCode::OK);
    }

    let restarted = start_server(&file).await?;
    let listed = c.get(format!("{}/items/", restarted.base_url)).send().await?.json::<Vec<Value>>().await?;
    assert_eq!(listed, records);
    assert_eq!(count(&c, &restarted).await?, records.len() as u64);

    let content = tokio::fs::read_to_string(&file).await?;
    assert_eq!(content.lines().next(), Some("id,nome,cognome,codice_fiscale"));
    Ok(())
}

#[tokio::test]
async fn e2e_corrupt_table_fails_startup() -> anyhow::Result<()> {
    let file = data_file();
    if let Some(dir) = file.parent() {
        tokio::fs::create_dir_all(dir).await?;
    }
    tokio::fs::write(&file, "id,nome,cognome,codice_fiscale\nnot-a-number,Anna,Bianchi,ABC\n").await?;
    assert!(start_server(&file).await.is_err());
    Ok(())
}
