//! Terminal rendering of entity tables and the dashboard.

use chrono::NaiveDate;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::dashboard::Dashboard;
use crate::display::{
  active_class, active_label, format_currency, format_date, format_phone, invoice_status_class,
  page_title, project_status_class, vendor_type_class, vendor_type_label, CurrencyFormat, Locale,
  DEFAULT_PROJECT_STATUS,
};
use crate::query::{ListQuery, SortState};
use crate::types::{Customer, Employee, Entity, EntityKind, Invoice, Project, PurchaseOrder, Vendor};

/// Ambient values the renderers need besides the rows.
#[derive(Debug, Clone)]
pub struct RenderContext {
  pub today: NaiveDate,
  /// Currency for amounts stored without one
  pub currency: String,
  /// Locale of dashboard amounts
  pub locale: Locale,
}

impl RenderContext {
  fn money(&self, amount: f64, currency: Option<&str>) -> String {
    format_currency(amount, Some(currency.unwrap_or(&self.currency)))
  }
}

/// A table column; `sort_field` is set when the column can be sorted.
#[derive(Debug, Clone, Copy)]
pub struct Column {
  pub label: &'static str,
  pub sort_field: Option<&'static str>,
}

const fn col(label: &'static str) -> Column {
  Column {
    label,
    sort_field: None,
  }
}

const fn sorted(label: &'static str, field: &'static str) -> Column {
  Column {
    label,
    sort_field: Some(field),
  }
}

/// How one entity is laid out as a table row.
pub trait TableRow: Entity {
  const KIND: EntityKind;
  const COLUMNS: &'static [Column];

  fn cells(&self, ctx: &RenderContext) -> Vec<Cell>;

  /// Rows drawn in the warning color
  fn flagged(&self, _ctx: &RenderContext) -> bool {
    false
  }

  /// Footer suffix summarizing the visible rows
  fn footer_note(_rows: &[Self], _ctx: &RenderContext) -> Option<String> {
    None
  }
}

fn dash(value: Option<&str>) -> String {
  match value {
    Some(v) if !v.is_empty() => v.to_string(),
    _ => "-".to_string(),
  }
}

/// Badge cell colored after its display class.
fn badge(label: &str, class: &str) -> Cell {
  let color = if class.contains("green") {
    Color::Green
  } else if class.contains("red") {
    Color::Red
  } else if class.contains("blue") {
    Color::Blue
  } else if class.contains("yellow") {
    Color::Yellow
  } else if class.contains("purple") {
    Color::Magenta
  } else {
    Color::Grey
  };
  Cell::new(label).fg(color)
}

fn strong(text: impl ToString) -> Cell {
  Cell::new(text).add_attribute(Attribute::Bold)
}

impl TableRow for Customer {
  const KIND: EntityKind = EntityKind::Customers;
  const COLUMNS: &'static [Column] = &[
    col("ID"),
    sorted("Customer Name", "name"),
    sorted("Contact Person", "contact_person"),
    sorted("Email", "email"),
    col("Phone"),
    col("Segment"),
    col("Status"),
  ];

  fn cells(&self, _ctx: &RenderContext) -> Vec<Cell> {
    vec![
      Cell::new(self.id),
      strong(&self.name),
      Cell::new(dash(self.contact_person.as_deref())),
      Cell::new(dash(self.email.as_deref())),
      Cell::new(dash(self.phone.as_deref().map(format_phone).as_deref())),
      Cell::new(dash(self.segment.as_deref())),
      badge(active_label(self.status), active_class(self.status)),
    ]
  }
}

impl TableRow for Employee {
  const KIND: EntityKind = EntityKind::Employees;
  const COLUMNS: &'static [Column] = &[
    col("ID"),
    sorted("Full Name", "first_name"),
    sorted("Last Name", "last_name"),
    col("Email"),
    col("Phone"),
    sorted("Department", "department"),
  ];

  fn cells(&self, _ctx: &RenderContext) -> Vec<Cell> {
    vec![
      Cell::new(self.id),
      strong(self.full_name()),
      Cell::new(&self.last_name),
      Cell::new(dash(self.email.as_deref())),
      Cell::new(dash(self.phone.as_deref().map(format_phone).as_deref())),
      Cell::new(dash(self.department.as_deref())),
    ]
  }
}

impl TableRow for Project {
  const KIND: EntityKind = EntityKind::Projects;
  const COLUMNS: &'static [Column] = &[
    col("ID"),
    sorted("Project Number", "project_number"),
    sorted("Customer", "customer_name"),
    sorted("Start Date", "start_date"),
    sorted("Status", "status"),
  ];

  fn cells(&self, _ctx: &RenderContext) -> Vec<Cell> {
    let status = self.status.as_deref().unwrap_or(DEFAULT_PROJECT_STATUS);
    vec![
      Cell::new(self.id),
      strong(&self.project_number),
      Cell::new(&self.customer_name),
      Cell::new(format_date(&self.start_date, Locale::EnUs)),
      badge(status, project_status_class(status)),
    ]
  }
}

impl TableRow for Vendor {
  const KIND: EntityKind = EntityKind::Vendors;
  const COLUMNS: &'static [Column] = &[
    col("ID"),
    sorted("Vendor No", "vendor_no"),
    sorted("Vendor Name", "vendor_name"),
    col("Vendor Type"),
    col("Contact Person"),
    col("Contact Info"),
    col("Payment"),
    col("Status"),
  ];

  fn cells(&self, _ctx: &RenderContext) -> Vec<Cell> {
    let mut contact = Vec::new();
    if let Some(email) = self.contact_email.as_deref().filter(|s| !s.is_empty()) {
      contact.push(email.to_string());
    }
    if let Some(phone) = self.contact_phone.as_deref().filter(|s| !s.is_empty()) {
      contact.push(format_phone(phone));
    }
    vec![
      Cell::new(self.id),
      strong(&self.vendor_no),
      strong(&self.vendor_name),
      badge(
        vendor_type_label(self.vendor_type),
        vendor_type_class(self.vendor_type),
      ),
      Cell::new(dash(self.contact_person.as_deref())),
      Cell::new(if contact.is_empty() {
        "-".to_string()
      } else {
        contact.join("\n")
      }),
      Cell::new(dash(self.payment.as_deref())),
      badge(active_label(self.status), active_class(self.status)),
    ]
  }
}

impl TableRow for PurchaseOrder {
  const KIND: EntityKind = EntityKind::PurchaseOrders;
  const COLUMNS: &'static [Column] = &[
    col("ID"),
    col("Project"),
    col("Vendor"),
    col("Cost Type"),
    sorted("Amount", "amount"),
    col("Status"),
    sorted("Created Date", "created_at"),
  ];

  fn cells(&self, ctx: &RenderContext) -> Vec<Cell> {
    let status = self.status();
    vec![
      Cell::new(self.id),
      strong(dash(self.project_no.as_deref())),
      Cell::new(dash(self.vendor_name.as_deref())),
      Cell::new(dash(self.cost_type.as_deref())),
      strong(ctx.money(self.amount, self.currency.as_deref())).set_alignment(CellAlignment::Right),
      badge(status.label(), status.badge_class()),
      Cell::new(match self.created_at.as_deref() {
        Some(ts) => format_date(ts, Locale::EnUs),
        None => "-".to_string(),
      }),
    ]
  }
}

impl TableRow for Invoice {
  const KIND: EntityKind = EntityKind::Invoices;
  const COLUMNS: &'static [Column] = &[
    col("ID"),
    sorted("Invoice No", "invoice_no"),
    col("Project"),
    sorted("Amount", "amount"),
    sorted("Invoice Date", "invoice_date"),
    sorted("Due Date", "due_date"),
    col("Status"),
  ];

  fn cells(&self, ctx: &RenderContext) -> Vec<Cell> {
    let due = format_date(&self.due_date, Locale::EnUs);
    let due = if self.is_overdue(ctx.today) {
      Cell::new(format!("{} Overdue", due)).fg(Color::Red)
    } else {
      Cell::new(due)
    };
    let status = self.status_label();
    vec![
      Cell::new(self.id),
      strong(&self.invoice_no),
      Cell::new(dash(self.project_no.as_deref())),
      strong(ctx.money(self.amount, self.currency.as_deref())).set_alignment(CellAlignment::Right),
      Cell::new(format_date(&self.invoice_date, Locale::EnUs)),
      due,
      badge(status, invoice_status_class(status)),
    ]
  }

  fn flagged(&self, ctx: &RenderContext) -> bool {
    self.is_overdue(ctx.today)
  }

  fn footer_note(rows: &[Self], ctx: &RenderContext) -> Option<String> {
    let overdue = rows.iter().filter(|i| i.is_overdue(ctx.today)).count();
    (overdue > 0).then(|| format!("• {} overdue", overdue))
  }
}

fn header_label(column: &Column, sort: &SortState) -> String {
  match column.sort_field {
    Some(field) if field == sort.field => format!("{} {}", column.label, sort.direction.arrow()),
    _ => column.label.to_string(),
  }
}

pub fn empty_message(kind: EntityKind, searching: bool) -> String {
  if searching {
    format!("No {} found matching search criteria", kind.noun())
  } else if kind == EntityKind::PurchaseOrders {
    format!("No {} yet", kind.noun())
  } else {
    format!("No {} registered yet", kind.noun())
  }
}

/// `Total N <noun>`, plus the entity's own note when it has one.
pub fn footer<T: TableRow>(rows: &[T], ctx: &RenderContext) -> String {
  let total = format!("Total {} {}", rows.len(), T::KIND.noun());
  match T::footer_note(rows, ctx) {
    Some(note) => format!("{} {}", total, note),
    None => total,
  }
}

/// Render the visible rows of a list view with header arrows and footer.
pub fn render_table<T: TableRow>(rows: &[T], query: &ListQuery, ctx: &RenderContext) -> String {
  let mut table = Table::new();
  table
    .load_preset(UTF8_FULL_CONDENSED)
    .set_content_arrangement(ContentArrangement::Dynamic)
    .set_header(
      T::COLUMNS
        .iter()
        .map(|c| Cell::new(header_label(c, query.sort())).add_attribute(Attribute::Bold)),
    );

  if rows.is_empty() {
    let message = empty_message(T::KIND, !query.search().is_empty());
    let mut cells = vec![Cell::new(message).fg(Color::Grey)];
    cells.extend((1..T::COLUMNS.len()).map(|_| Cell::new("")));
    table.add_row(cells);
  }

  for row in rows {
    let cells = row.cells(ctx);
    if row.flagged(ctx) {
      table.add_row(cells.into_iter().map(|c| c.bg(Color::DarkRed)));
    } else {
      table.add_row(cells);
    }
  }

  format!("{}\n{}", table, footer(rows, ctx))
}

/// Render the dashboard cards and both charts as tables.
pub fn render_dashboard(dashboard: &Dashboard, ctx: &RenderContext) -> String {
  let money = |amount: f64| CurrencyFormat::new(ctx.locale).format(amount, &ctx.currency);
  let whole = |amount: f64| CurrencyFormat::whole(ctx.locale).format(amount, &ctx.currency);
  let stats = &dashboard.stats;

  let mut cards = Table::new();
  cards
    .load_preset(UTF8_FULL_CONDENSED)
    .set_header(vec![strong("Metric"), strong("Value")]);
  for (label, value) in [
    ("Total Customers", stats.total_customers.to_string()),
    ("Active Projects", stats.active_projects.to_string()),
    ("Vendors", stats.total_vendors.to_string()),
    ("Employees", stats.total_employees.to_string()),
    ("Active Purchase Orders", stats.active_purchase_orders.to_string()),
    ("Pending Invoices", stats.pending_invoices.to_string()),
    ("Total Revenue", money(stats.total_revenue)),
    ("Monthly Revenue", money(stats.monthly_revenue)),
  ] {
    cards.add_row(vec![Cell::new(label), Cell::new(value).set_alignment(CellAlignment::Right)]);
  }

  let mut status = Table::new();
  status
    .load_preset(UTF8_FULL_CONDENSED)
    .set_header(vec![strong("Project Status"), strong("Count"), strong("Color")]);
  if dashboard.project_status.is_empty() {
    status.add_row(vec![Cell::new("No project data found").fg(Color::Grey)]);
  }
  for slice in &dashboard.project_status {
    status.add_row(vec![
      Cell::new(&slice.label),
      Cell::new(slice.count).set_alignment(CellAlignment::Right),
      Cell::new(slice.color),
    ]);
  }

  let mut revenue = Table::new();
  revenue
    .load_preset(UTF8_FULL_CONDENSED)
    .set_header(vec![strong("Month"), strong("Revenue")]);
  for month in &dashboard.revenue {
    revenue.add_row(vec![
      Cell::new(&month.label),
      Cell::new(whole(month.revenue)).set_alignment(CellAlignment::Right),
    ]);
  }

  format!(
    "{}\n{}\nTotal {} customers registered\n\nProject Status Distribution\n{}\n\nMonthly Revenue Trend\n{}",
    page_title("/"),
    cards,
    stats.total_customers,
    status,
    revenue
  )
}
