//! Interactive shell
//!
//! Commands are handled on the input loop; query results arrive through the
//! controller's published snapshot and are printed by a separate watcher task,
//! so `:cancel` works while a query is still running.

use anyhow::{Context, Result};
use querybench_core::BackendGateway;
use querybench_drivers::MySqlGateway;
use querybench_lsp::{CatalogKey, CatalogLoad, CatalogStore, SqlCompletionProvider};
use querybench_query::{QuerySessionController, SessionSnapshot, validate_submission};
use querybench_settings::QueryBenchSettings;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::cli::Args;
use crate::commands::{HELP, ShellCommand, parse_command};
use crate::render;

/// What the input loop should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Silent,
    Quit,
}

pub struct Shell {
    settings: QueryBenchSettings,
    gateway: Arc<dyn BackendGateway>,
    controller: Arc<QuerySessionController>,
    catalog: Arc<CatalogStore>,
    completions: SqlCompletionProvider,
    connection_id: Option<String>,
    database: Option<String>,
    page: Option<(u32, u32)>,
    catalog_task: Option<JoinHandle<CatalogLoad>>,
}

impl Shell {
    pub fn new(settings: QueryBenchSettings, gateway: Arc<dyn BackendGateway>) -> Self {
        let controller = Arc::new(QuerySessionController::with_history_limit(
            gateway.clone(),
            settings.session.history_limit,
        ));
        let catalog = Arc::new(CatalogStore::with_extra_keywords(
            settings.completion.extra_keywords.clone(),
        ));
        let completions = SqlCompletionProvider::new(catalog.clone());

        Self {
            settings,
            gateway,
            controller,
            catalog,
            completions,
            connection_id: None,
            database: None,
            page: None,
            catalog_task: None,
        }
    }

    pub fn controller(&self) -> &Arc<QuerySessionController> {
        &self.controller
    }

    pub fn catalog(&self) -> &Arc<CatalogStore> {
        &self.catalog
    }

    pub fn connection_id(&self) -> Option<&str> {
        self.connection_id.as_deref()
    }

    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    /// Apply the startup selection: the requested connection, else the first
    /// configured profile; the requested database, else the profile's own.
    pub fn select_initial(&mut self, connection: Option<String>, database: Option<String>) -> Reply {
        let connection = connection.or_else(|| {
            self.settings
                .connections
                .first()
                .map(|profile| profile.id.clone())
        });

        let Some(connection) = connection else {
            return Reply::Text(
                "no connection profiles configured; add one to the settings file".to_string(),
            );
        };

        let reply = self.select_connection(connection);
        match database {
            Some(database) if self.connection_id.is_some() => self.select_database(database),
            _ => reply,
        }
    }

    pub async fn handle(&mut self, command: ShellCommand) -> Reply {
        match command {
            ShellCommand::Empty => Reply::Silent,
            ShellCommand::Quit => Reply::Quit,
            ShellCommand::Help => Reply::Text(HELP.to_string()),
            ShellCommand::Use(database) => self.select_database(database),
            ShellCommand::Connection(id) => self.select_connection(id),
            ShellCommand::Cancel => match self.controller.cancel() {
                Some(_) => Reply::Silent,
                None => Reply::Text("no query is running".to_string()),
            },
            ShellCommand::History(filter) => {
                let entries = match filter {
                    Some(filter) => self.controller.search_history(&filter),
                    None => self.controller.history(),
                };
                Reply::Text(render::render_history(&entries))
            }
            ShellCommand::Complete(text) => {
                if self.catalog.is_loading() {
                    tracing::debug!("completion requested while the catalog is loading");
                }
                let items = self.completions.completions(&text, text.len());
                Reply::Text(render::render_completions(&items))
            }
            ShellCommand::Databases => self.list_databases().await,
            ShellCommand::Page(page) => {
                self.page = page;
                Reply::Text(match page {
                    Some((page, size)) => format!("page {} of {} rows", page, size),
                    None => "pagination off".to_string(),
                })
            }
            ShellCommand::Clear => {
                self.controller.clear_result();
                self.controller.clear_error();
                Reply::Silent
            }
            ShellCommand::Submit(sql) => self.submit(sql),
        }
    }

    fn submit(&mut self, sql: String) -> Reply {
        match validate_submission(self.connection_id.as_deref(), self.database.as_deref(), &sql) {
            Ok(request) => {
                let request = match self.page {
                    Some((page, size)) => request.with_page(page, size),
                    None => request,
                };
                // Settlement is reported through the snapshot watcher.
                let _ = self.controller.submit(request);
                Reply::Silent
            }
            Err(e) => Reply::Text(format!("error: {}", e)),
        }
    }

    fn select_connection(&mut self, id: String) -> Reply {
        let Some(profile) = self.settings.connection(&id) else {
            return Reply::Text(format!("error: unknown connection '{}'", id));
        };

        let message = format!("connected profile {}", profile.display_name());
        let database = profile.database.clone();
        self.connection_id = Some(id);
        self.database = None;
        self.catalog.clear();

        match database {
            Some(database) => {
                let reply = format!("{}, using {}", message, database);
                self.select_database(database);
                Reply::Text(reply)
            }
            None => Reply::Text(message),
        }
    }

    fn select_database(&mut self, database: String) -> Reply {
        let Some(connection_id) = self.connection_id.clone() else {
            return Reply::Text("error: Please select a connection".to_string());
        };

        self.database = Some(database.clone());
        if self.catalog.needs_reload(&connection_id, &database) {
            let key = CatalogKey::new(connection_id, database.clone());
            let epoch = self.catalog.begin_load(key.clone());
            let catalog = self.catalog.clone();
            let gateway = self.gateway.clone();
            self.catalog_task = Some(tokio::spawn(async move {
                catalog.finish_load(gateway.as_ref(), &key, epoch).await
            }));
        }
        Reply::Text(format!("using {}", database))
    }

    async fn list_databases(&self) -> Reply {
        let Some(connection_id) = &self.connection_id else {
            return Reply::Text("error: Please select a connection".to_string());
        };
        match self.gateway.list_databases(connection_id).await {
            Ok(databases) => Reply::Text(render::render_list("databases", &databases)),
            Err(e) => Reply::Text(format!("error: {}", e)),
        }
    }

    /// Wait for the most recent catalog load started by this shell
    pub async fn wait_for_catalog(&mut self) -> Option<CatalogLoad> {
        let task = self.catalog_task.take()?;
        task.await.ok()
    }

    fn prompt(&self) -> String {
        match (&self.connection_id, &self.database) {
            (Some(connection), Some(database)) => format!("{}/{}> ", connection, database),
            (Some(connection), None) => format!("{}> ", connection),
            _ => "querybench> ".to_string(),
        }
    }
}

/// Print what changed each time the controller publishes a snapshot
async fn watch_snapshots(mut rx: watch::Receiver<SessionSnapshot>) {
    let mut previous = rx.borrow_and_update().clone();
    while rx.changed().await.is_ok() {
        let next = rx.borrow_and_update().clone();
        for notice in render::notices(&previous, &next) {
            println!("{}", render::render_notice(&notice));
        }
        previous = next;
    }
}

/// Run the shell on stdin until `:quit` or end of input
pub async fn run(settings: QueryBenchSettings, args: Args) -> Result<()> {
    let mysql = Arc::new(MySqlGateway::with_profiles(settings.connections.clone()));
    let mut shell = Shell::new(settings, mysql.clone());

    let watcher = tokio::spawn(watch_snapshots(shell.controller.subscribe()));

    if let Reply::Text(text) = shell.select_initial(args.connection, args.database) {
        println!("{}", text);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{}", shell.prompt());
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("Failed to read from stdin")? else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("error: {}", e);
                continue;
            }
        };

        match shell.handle(command).await {
            Reply::Text(text) => println!("{}", text),
            Reply::Silent => {}
            Reply::Quit => break,
        }
    }

    if shell.controller.cancel().is_some() {
        tracing::info!("cancelled running query on exit");
    }
    watcher.abort();
    mysql.disconnect_all().await;
    tracing::info!("shell exited");
    Ok(())
}

#[cfg(test)]
mod tests;
