use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use erpdesk::dashboard::{compute_stats, revenue_by_month, Dashboard, DashboardInput};
use erpdesk::types::{Customer, Employee, Invoice, Project, PurchaseOrder, Vendor};

fn parse<T: DeserializeOwned>(value: Value) -> Vec<T> {
  serde_json::from_value(value).unwrap()
}

fn today() -> NaiveDate {
  NaiveDate::from_ymd_opt(2024, 3, 18).unwrap()
}

fn invoices() -> Vec<Invoice> {
  parse(json!([
    {"id": 1, "invoice_no": "INV-1", "project_id": 1, "amount": 1000.0, "invoice_date": "2024-03-02", "due_date": "2024-04-01", "status": "Paid"},
    {"id": 2, "invoice_no": "INV-2", "project_id": 1, "amount": 250.5, "invoice_date": "2024-03-10", "due_date": "2024-04-10", "status": "Paid"},
    {"id": 3, "invoice_no": "INV-3", "project_id": 2, "amount": 400.0, "invoice_date": "2024-01-15", "due_date": "2024-02-15", "status": "Paid"},
    {"id": 4, "invoice_no": "INV-4", "project_id": 2, "amount": 900.0, "invoice_date": "2024-03-12", "due_date": "2024-04-12"},
    {"id": 5, "invoice_no": "INV-5", "project_id": 3, "amount": 75.0, "invoice_date": "2024-02-20", "due_date": "2024-03-01", "status": "Overdue"},
    {"id": 6, "invoice_no": "INV-6", "project_id": 3, "amount": 60.0, "invoice_date": "2023-09-20", "due_date": "2023-10-01", "status": "Paid"},
    {"id": 7, "invoice_no": "INV-7", "project_id": 3, "amount": 5.0, "invoice_date": "not a date", "due_date": "2024-03-01", "status": "Paid"},
  ]))
}

#[test]
fn test_stats() {
  let customers: Vec<Customer> = parse(json!([{"id": 1, "name": "Acme"}, {"id": 2, "name": "Globex"}]));
  let employees: Vec<Employee> = parse(json!([{"id": 1, "first_name": "Ada", "last_name": "Byron"}]));
  let projects: Vec<Project> = parse(json!([
    {"id": 1, "project_number": "P-1", "customer_name": "Acme", "start_date": "2024-01-01", "status": "Active"},
    {"id": 2, "project_number": "P-2", "customer_name": "Acme", "start_date": "2024-01-01"},
    {"id": 3, "project_number": "P-3", "customer_name": "Globex", "start_date": "2024-01-01", "status": "Completed"},
  ]));
  let vendors: Vec<Vendor> = parse(json!([
    {"id": 1, "vendor_no": "V-1", "vendor_name": "Steelworks"},
    {"id": 2, "vendor_no": "V-2", "vendor_name": "Timber"},
    {"id": 3, "vendor_no": "V-3", "vendor_name": "Glass"},
  ]));
  let purchase_orders: Vec<PurchaseOrder> = parse(json!([
    {"id": 1, "project_id": 1, "vendor_id": 1, "amount": 10.0, "status": 0},
    {"id": 2, "project_id": 1, "vendor_id": 1, "amount": 10.0, "status": 1},
    {"id": 3, "project_id": 1, "vendor_id": 2, "amount": 10.0, "status": 2},
    {"id": 4, "project_id": 1, "vendor_id": 2, "amount": 10.0, "status": 3},
    {"id": 5, "project_id": 1, "vendor_id": 3, "amount": 10.0},
  ]));
  let invoices = invoices();

  let input = DashboardInput {
    customers: &customers,
    employees: &employees,
    projects: &projects,
    vendors: &vendors,
    purchase_orders: &purchase_orders,
    invoices: &invoices,
  };
  let stats = compute_stats(input, today());

  assert_eq!(stats.total_customers, 2);
  assert_eq!(stats.total_employees, 1);
  assert_eq!(stats.total_vendors, 3);
  // Missing status counts as Active
  assert_eq!(stats.active_projects, 2);
  // Ordered, Under Review, and the one without a status
  assert_eq!(stats.active_purchase_orders, 3);
  // Missing status counts as Pending
  assert_eq!(stats.pending_invoices, 1);
  assert_eq!(stats.total_revenue, 1000.0 + 250.5 + 400.0 + 60.0 + 5.0);
  assert_eq!(stats.monthly_revenue, 1250.5);
}

#[test]
fn test_empty_collections() {
  let dashboard = Dashboard::compute(DashboardInput::default(), today());
  assert_eq!(dashboard.stats.total_customers, 0);
  assert_eq!(dashboard.stats.total_revenue, 0.0);
  assert!(dashboard.project_status.is_empty());
  assert_eq!(dashboard.revenue.len(), 6);
  assert!(dashboard.revenue.iter().all(|m| m.revenue == 0.0));
}

#[test]
fn test_revenue_by_month() {
  let months = revenue_by_month(&invoices(), today(), 6);
  let rows: Vec<(&str, f64)> = months.iter().map(|m| (m.label.as_str(), m.revenue)).collect();
  assert_eq!(
    rows,
    vec![
      ("Oct 2023", 0.0),
      ("Nov 2023", 0.0),
      ("Dec 2023", 0.0),
      ("Jan 2024", 400.0),
      ("Feb 2024", 0.0),
      ("Mar 2024", 1250.5),
    ]
  );
  assert_eq!(months[5].year, 2024);
  assert_eq!(months[5].month, 3);
}

#[test]
fn test_revenue_window_length() {
  let months = revenue_by_month(&invoices(), today(), 12);
  assert_eq!(months.len(), 12);
  assert_eq!(months[0].label, "Apr 2023");
  assert_eq!(months[5].revenue, 60.0);
}
