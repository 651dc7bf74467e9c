use std::collections::HashMap;
use std::sync::Arc;

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use super::commands::{load_dashboard, parse_payload};
use super::page::{page_for, PageView};
use super::render::{render_dashboard, RenderContext};
use crate::db::CollectionBackend;
use crate::display::page_title;
use crate::types::EntityKind;

const HELP: &str = "Commands:
  .use <entity>          open an entity page (customers, employees, projects,
                         vendors, purchase_orders, invoices)
  .search <term>         filter the current page (empty clears)
  .sort <field>          sort by field; again to flip direction
  .refresh               re-fetch the current page
  .create <json>         create a record
  .update <id> <json>    apply a partial change
  .delete <id>           delete a record (asks first)
  .dashboard             show the dashboard
  .help, .quit
Anything else is taken as a search term.";

pub struct Repl {
  backend: Arc<dyn CollectionBackend>,
  ctx: RenderContext,
  editor: DefaultEditor,
  pages: Pages,
  current: EntityKind,
}

/// Entity pages visited so far, keyed by kind.
struct Pages {
  backend: Arc<dyn CollectionBackend>,
  loaded: HashMap<EntityKind, Box<dyn PageView>>,
}

impl Pages {
  fn new(backend: Arc<dyn CollectionBackend>) -> Self {
    Self {
      backend,
      loaded: HashMap::new(),
    }
  }

  /// The page for `kind` with its first load done. A failed load stays on
  /// the page and is rendered in place of the table.
  async fn get(&mut self, kind: EntityKind) -> &mut Box<dyn PageView> {
    let backend = self.backend.clone();
    let page = self
      .loaded
      .entry(kind)
      .or_insert_with(|| page_for(kind, backend));
    if let Err(e) = page.open().await {
      tracing::debug!(entity = %kind, error = %e, "Initial load failed");
    }
    page
  }
}

fn print_error(context: &str, err: impl std::fmt::Display) {
  eprintln!("{} {}", format!("{}:", context).red().bold(), err);
}

impl Repl {
  pub fn new(backend: Arc<dyn CollectionBackend>, ctx: RenderContext) -> Result<Self, anyhow::Error> {
    Ok(Self {
      pages: Pages::new(backend.clone()),
      backend,
      ctx,
      editor: DefaultEditor::new()?,
      current: EntityKind::Customers,
    })
  }

  pub async fn run(&mut self) -> Result<(), anyhow::Error> {
    println!("{} v{}", "erpdesk".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Type {} for help\n", ".help".cyan());

    self.show_dashboard().await;

    loop {
      let prompt = format!("{} ", format!("erpdesk:{}>", self.current).green());
      match self.editor.readline(&prompt) {
        Ok(line) => {
          let line = line.trim();
          if line.is_empty() {
            continue;
          }
          let _ = self.editor.add_history_entry(line);
          if line.starts_with('.') {
            if !self.command(line).await {
              break;
            }
          } else {
            self.search(line).await;
          }
        }
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
        Err(e) => {
          eprintln!("Error: {:?}", e);
          break;
        }
      }
    }
    Ok(())
  }

  async fn page(&mut self) -> &mut Box<dyn PageView> {
    let kind = self.current;
    self.pages.get(kind).await
  }

  async fn show(&mut self) {
    let ctx = self.ctx.clone();
    let title = page_title(self.current.path());
    let table = self.page().await.render(&ctx);
    println!("{}\n{}", title.bold(), table);
  }

  async fn show_dashboard(&self) {
    match load_dashboard(self.backend.clone(), self.ctx.today).await {
      Ok(dashboard) => println!("{}", render_dashboard(&dashboard, &self.ctx)),
      Err(e) => print_error("Error", e),
    }
  }

  async fn open(&mut self, kind: EntityKind) {
    self.current = kind;
    self.show().await;
  }

  async fn search(&mut self, term: &str) {
    self.page().await.set_search(term);
    self.show().await;
  }

  fn confirm(&mut self, question: &str) -> bool {
    match self.editor.readline(&format!("{} [y/N] ", question)) {
      Ok(answer) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
      Err(_) => false,
    }
  }

  async fn command(&mut self, line: &str) -> bool {
    let (cmd, rest) = match line.split_once(char::is_whitespace) {
      Some((cmd, rest)) => (cmd, rest.trim()),
      None => (line, ""),
    };

    match cmd {
      ".help" => println!("{}", HELP),
      ".use" => match rest.parse::<EntityKind>() {
        Ok(kind) => self.open(kind).await,
        Err(e) => print_error("Error", e),
      },
      ".search" => self.search(rest).await,
      ".sort" => match self.page().await.select_sort(rest) {
        Ok(_) => self.show().await,
        Err(e) => print_error("Error", e),
      },
      ".refresh" => {
        let _ = self.page().await.refresh().await;
        self.show().await;
      }
      ".create" => match parse_payload(rest) {
        Ok(payload) => match self.page().await.create(&payload).await {
          Ok(label) => {
            println!("{} {}", "Created".green(), label);
            self.show().await;
          }
          Err(e) => print_error("Create failed", e),
        },
        Err(e) => print_error("Invalid JSON", e),
      },
      ".update" => {
        let Some((id, json)) = rest.split_once(char::is_whitespace) else {
          print_error("Usage", ".update <id> <json>");
          return true;
        };
        let (Ok(id), Ok(payload)) = (id.parse::<i64>(), parse_payload(json.trim())) else {
          print_error("Usage", ".update <id> <json>");
          return true;
        };
        match self.page().await.update(id, &payload).await {
          Ok(Some(label)) => {
            println!("{} {}", "Updated".green(), label);
            self.show().await;
          }
          Ok(None) => println!("{} no record with id {}", "Unchanged:".yellow(), id),
          Err(e) => print_error("Update failed", e),
        }
      }
      ".delete" => {
        let Ok(id) = rest.parse::<i64>() else {
          print_error("Usage", ".delete <id>");
          return true;
        };
        let label = self.page().await.describe(id).unwrap_or_else(|| format!("#{}", id));
        if !self.confirm(&format!("Are you sure you want to delete {}?", label)) {
          println!("Cancelled");
          return true;
        }
        match self.page().await.delete(id).await {
          Ok(()) => {
            println!("{} {}", "Deleted".green(), label);
            self.show().await;
          }
          Err(e) => print_error("Delete failed", e),
        }
      }
      ".dashboard" => self.show_dashboard().await,
      ".quit" | ".exit" => return false,
      _ => eprintln!("Unknown command, type {} for help", ".help".cyan()),
    }
    true
  }
}
