use axum::extract::State;
use marketplace_admin_api::{
    config::AppConfig,
    db::create_orm_conn,
    routes::health::health_check,
    state::AppState,
};

#[tokio::test]
async fn health_check_reports_database_up() -> anyhow::Result<()> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run health test.");
            return Ok(());
        }
    };

    let orm = create_orm_conn(&database_url).await?;
    let config = AppConfig {
        database_url,
        host: "127.0.0.1".into(),
        port: 0,
        upload_dir: std::env::temp_dir().to_string_lossy().into_owned(),
        public_upload_url: "/uploads".into(),
        max_upload_bytes: 1024,
    };

    let response = health_check(State(AppState::new(orm, config))).await;
    assert_eq!(response.0.message, "Health check");

    let data = response.0.data.expect("health data");
    assert_eq!(data.status, "ok");
    assert_eq!(data.database, "up");
    Ok(())
}
