use super::*;
use async_trait::async_trait;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use querybench_core::{
    CompletionCatalog, ConnectionProfile, QueryBenchError, QueryRequest, QueryResult,
};
use serde_json::json;

/// Gateway that answers immediately and records executed requests
#[derive(Default)]
struct StubGateway {
    executed: Mutex<Vec<QueryRequest>>,
}

#[async_trait]
impl BackendGateway for StubGateway {
    async fn execute(&self, request: &QueryRequest) -> querybench_core::Result<QueryResult> {
        self.executed.lock().push(request.clone());
        Ok(QueryResult {
            columns: vec!["n".into()],
            rows: vec![vec![json!(1)]],
            total_rows: 1,
            execution_time_ms: 1,
        })
    }

    async fn fetch_completion_catalog(
        &self,
        _connection_id: &str,
        database: &str,
    ) -> querybench_core::Result<CompletionCatalog> {
        match database {
            "shop" => Ok(CompletionCatalog::from_tables([
                ("users", vec!["id", "email"]),
                ("orders", vec!["id", "user_id"]),
            ])),
            other => Err(QueryBenchError::Schema(format!("Unknown database '{}'", other))),
        }
    }

    async fn list_databases(&self, _connection_id: &str) -> querybench_core::Result<Vec<String>> {
        Ok(vec!["blog".into(), "shop".into()])
    }
}

fn settings() -> QueryBenchSettings {
    let mut local = ConnectionProfile::new("local", "127.0.0.1", "root");
    local.database = Some("shop".into());
    let bare = ConnectionProfile::new("bare", "127.0.0.1", "root");

    let mut settings = QueryBenchSettings::default();
    settings.connections = vec![local, bare];
    settings.completion.extra_keywords = vec!["EXPLAIN".into()];
    settings
}

fn shell() -> (Shell, Arc<StubGateway>) {
    let gateway = Arc::new(StubGateway::default());
    (Shell::new(settings(), gateway.clone()), gateway)
}

async fn command(shell: &mut Shell, line: &str) -> Reply {
    let command = parse_command(line).expect("valid command");
    shell.handle(command).await
}

async fn wait_for_result(shell: &Shell) {
    let mut rx = shell.controller().subscribe();
    rx.wait_for(|snapshot| snapshot.current_result.is_some())
        .await
        .expect("controller alive");
}

#[tokio::test]
async fn test_startup_selects_first_profile_and_loads_catalog() {
    let (mut shell, _gateway) = shell();

    let reply = shell.select_initial(None, None);
    assert_eq!(
        reply,
        Reply::Text("connected profile local, using shop".to_string())
    );
    assert_eq!(shell.connection_id(), Some("local"));
    assert_eq!(shell.database(), Some("shop"));
    assert_eq!(shell.wait_for_catalog().await, Some(CatalogLoad::Applied));

    let reply = command(&mut shell, ":complete SELECT * FROM ").await;
    assert_eq!(
        reply,
        Reply::Text("table    users  (Table)\ntable    orders  (Table)".to_string())
    );

    let catalog = shell.catalog().current().expect("catalog loaded");
    assert!(catalog.keywords.iter().any(|k| k == "EXPLAIN"));
}

#[tokio::test]
async fn test_startup_database_overrides_profile_database() {
    let (mut shell, _gateway) = shell();

    let reply = shell.select_initial(Some("local".into()), Some("blog".into()));
    assert_eq!(reply, Reply::Text("using blog".to_string()));
    assert_eq!(shell.database(), Some("blog"));

    // "blog" has no catalog on the stub; the failed load leaves it absent.
    assert_eq!(shell.wait_for_catalog().await, Some(CatalogLoad::Failed));
    assert!(shell.catalog().current().is_none());
    assert_eq!(
        command(&mut shell, ":complete SELECT ").await,
        Reply::Text("no suggestions".to_string())
    );
}

#[tokio::test]
async fn test_submit_requires_connection_and_database() {
    let (mut shell, gateway) = shell();

    assert_eq!(
        command(&mut shell, "SELECT 1").await,
        Reply::Text("error: Please select a connection".to_string())
    );

    command(&mut shell, ":connection bare").await;
    assert_eq!(
        command(&mut shell, "SELECT 1").await,
        Reply::Text("error: Please select a database".to_string())
    );
    assert!(gateway.executed.lock().is_empty());
}

#[tokio::test]
async fn test_submit_runs_query_with_pagination() {
    let (mut shell, gateway) = shell();
    shell.select_initial(Some("local".into()), None);

    assert_eq!(
        command(&mut shell, ":page 2 25").await,
        Reply::Text("page 2 of 25 rows".to_string())
    );
    assert_eq!(command(&mut shell, "SELECT * FROM users").await, Reply::Silent);
    wait_for_result(&shell).await;

    let executed = gateway.executed.lock().clone();
    assert_eq!(executed.len(), 1);
    assert_eq!(executed[0].sql, "SELECT * FROM users");
    assert_eq!(executed[0].database.as_deref(), Some("shop"));
    assert_eq!(executed[0].pagination(), Some((2, 25)));

    let history = shell.controller().history();
    assert_eq!(history.len(), 1);
    assert!(history[0].success);
}

#[tokio::test]
async fn test_unknown_connection_keeps_selection() {
    let (mut shell, _gateway) = shell();
    shell.select_initial(Some("local".into()), None);

    assert_eq!(
        command(&mut shell, ":connection nope").await,
        Reply::Text("error: unknown connection 'nope'".to_string())
    );
    assert_eq!(shell.connection_id(), Some("local"));
}

#[tokio::test]
async fn test_databases_and_idle_cancel() {
    let (mut shell, _gateway) = shell();

    assert_eq!(
        command(&mut shell, ":databases").await,
        Reply::Text("error: Please select a connection".to_string())
    );

    shell.select_initial(Some("bare".into()), None);
    assert_eq!(
        command(&mut shell, ":databases").await,
        Reply::Text("blog\nshop".to_string())
    );
    assert_eq!(
        command(&mut shell, ":cancel").await,
        Reply::Text("no query is running".to_string())
    );
    assert_eq!(command(&mut shell, ":quit").await, Reply::Quit);
}

#[tokio::test]
async fn test_history_filter() {
    let (mut shell, _gateway) = shell();
    shell.select_initial(Some("local".into()), None);

    let mut rx = shell.controller().subscribe();
    for (idx, sql) in ["SELECT * FROM users", "SELECT * FROM orders"].into_iter().enumerate() {
        command(&mut shell, sql).await;
        rx.wait_for(|snapshot| snapshot.history.len() == idx + 1)
            .await
            .expect("controller alive");
    }

    let Reply::Text(filtered) = command(&mut shell, ":history USERS").await else {
        panic!("expected history text");
    };
    assert!(filtered.contains("SELECT * FROM users"));
    assert!(!filtered.contains("orders"));

    let Reply::Text(all) = command(&mut shell, ":history").await else {
        panic!("expected history text");
    };
    assert!(all.contains("users") && all.contains("orders"));

    assert_eq!(
        command(&mut shell, ":history posts").await,
        Reply::Text("history is empty".to_string())
    );
}
