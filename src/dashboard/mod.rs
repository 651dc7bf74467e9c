//! Dashboard aggregation over the fetched collections.
//!
//! Everything here is a pure function of the collections and a "today"
//! date. Amounts are summed as stored, without currency conversion.

use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

use crate::display::{parse_date, PurchaseOrderStatus, DEFAULT_INVOICE_STATUS, DEFAULT_PROJECT_STATUS};
use crate::types::{Customer, Employee, Invoice, Project, PurchaseOrder, Vendor};

/// Slice colors, assigned in order and cycled.
pub const CHART_COLORS: [&str; 5] = ["#10b981", "#3b82f6", "#f59e0b", "#ef4444", "#8b5cf6"];

/// Project statuses in the order their slices are drawn.
const PROJECT_STATUS_ORDER: [&str; 4] = ["Active", "On Hold", "Completed", "Cancelled"];

/// Number of months the revenue trend covers, ending with the current one.
pub const REVENUE_MONTHS: u32 = 6;

/// Borrowed view of the six collections.
#[derive(Debug, Clone, Copy, Default)]
pub struct DashboardInput<'a> {
  pub customers: &'a [Customer],
  pub employees: &'a [Employee],
  pub projects: &'a [Project],
  pub vendors: &'a [Vendor],
  pub purchase_orders: &'a [PurchaseOrder],
  pub invoices: &'a [Invoice],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
  pub total_customers: usize,
  pub active_projects: usize,
  pub total_vendors: usize,
  pub total_employees: usize,
  pub active_purchase_orders: usize,
  pub pending_invoices: usize,
  pub total_revenue: f64,
  pub monthly_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSlice {
  pub label: String,
  pub count: usize,
  pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRevenue {
  pub year: i32,
  pub month: u32,
  /// Axis label, e.g. "Mar 2024"
  pub label: String,
  pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
  pub stats: DashboardStats,
  pub project_status: Vec<ChartSlice>,
  pub revenue: Vec<MonthlyRevenue>,
}

impl Dashboard {
  pub fn compute(input: DashboardInput<'_>, today: NaiveDate) -> Self {
    Self {
      stats: compute_stats(input, today),
      project_status: project_status_chart(input.projects),
      revenue: revenue_by_month(input.invoices, today, REVENUE_MONTHS),
    }
  }
}

fn is_paid(invoice: &Invoice) -> bool {
  invoice.status.as_deref() == Some("Paid")
}

fn same_month(date: NaiveDate, year: i32, month: u32) -> bool {
  date.year() == year && date.month() == month
}

pub fn compute_stats(input: DashboardInput<'_>, today: NaiveDate) -> DashboardStats {
  let paid = || input.invoices.iter().filter(|i| is_paid(i));

  DashboardStats {
    total_customers: input.customers.len(),
    active_projects: input
      .projects
      .iter()
      .filter(|p| p.status.as_deref().unwrap_or(DEFAULT_PROJECT_STATUS) == "Active")
      .count(),
    total_vendors: input.vendors.len(),
    total_employees: input.employees.len(),
    active_purchase_orders: input
      .purchase_orders
      .iter()
      .filter(|po| po.status().is_open())
      .count(),
    pending_invoices: input
      .invoices
      .iter()
      .filter(|i| i.status.as_deref().unwrap_or(DEFAULT_INVOICE_STATUS) == "Pending")
      .count(),
    total_revenue: paid().map(|i| i.amount).sum(),
    monthly_revenue: paid()
      .filter(|i| {
        parse_date(&i.invoice_date).is_some_and(|d| same_month(d, today.year(), today.month()))
      })
      .map(|i| i.amount)
      .sum(),
  }
}

/// One slice per project status label, known statuses first.
pub fn project_status_chart(projects: &[Project]) -> Vec<ChartSlice> {
  let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
  for project in projects {
    *counts
      .entry(project.status.as_deref().unwrap_or(DEFAULT_PROJECT_STATUS))
      .or_default() += 1;
  }

  let mut ordered: Vec<(&str, usize)> = PROJECT_STATUS_ORDER
    .iter()
    .filter_map(|status| counts.remove(status).map(|n| (*status, n)))
    .collect();
  ordered.extend(counts);

  ordered
    .into_iter()
    .enumerate()
    .map(|(i, (label, count))| ChartSlice {
      label: label.to_string(),
      count,
      color: CHART_COLORS[i % CHART_COLORS.len()],
    })
    .collect()
}

/// Paid revenue for the `months` calendar months ending with today's,
/// oldest first. Months without paid invoices report zero.
pub fn revenue_by_month(invoices: &[Invoice], today: NaiveDate, months: u32) -> Vec<MonthlyRevenue> {
  let Some(current) = today.with_day(1) else {
    return Vec::new();
  };

  (0..months)
    .rev()
    .filter_map(|back| current.checked_sub_months(Months::new(back)))
    .map(|start| {
      let revenue = invoices
        .iter()
        .filter(|i| is_paid(i))
        .filter(|i| {
          parse_date(&i.invoice_date).is_some_and(|d| same_month(d, start.year(), start.month()))
        })
        .map(|i| i.amount)
        .sum();
      MonthlyRevenue {
        year: start.year(),
        month: start.month(),
        label: start.format("%b %Y").to_string(),
        revenue,
      }
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn project(id: i64, status: Option<&str>) -> Project {
    Project {
      id,
      project_number: format!("P-{}", id),
      customer_name: "Acme".to_string(),
      start_date: "2024-01-01".to_string(),
      status: status.map(str::to_string),
      created_at: None,
      updated_at: None,
    }
  }

  #[test]
  fn test_project_status_chart_order_and_colors() {
    let projects = vec![
      project(1, Some("Completed")),
      project(2, None),
      project(3, Some("Archived")),
      project(4, Some("Active")),
      project(5, Some("Blocked")),
      project(6, Some("On Hold")),
    ];
    let chart = project_status_chart(&projects);
    let labels: Vec<_> = chart.iter().map(|s| (s.label.as_str(), s.count, s.color)).collect();
    assert_eq!(
      labels,
      vec![
        ("Active", 2, "#10b981"),
        ("On Hold", 1, "#3b82f6"),
        ("Completed", 1, "#f59e0b"),
        ("Archived", 1, "#ef4444"),
        ("Blocked", 1, "#8b5cf6"),
      ]
    );
  }

  #[test]
  fn test_project_status_chart_cycles_palette() {
    let projects: Vec<_> = (0..6).map(|i| project(i, Some(["a", "b", "c", "d", "e", "f"][i as usize]))).collect();
    let chart = project_status_chart(&projects);
    assert_eq!(chart.len(), 6);
    assert_eq!(chart[5].color, CHART_COLORS[0]);
  }

  #[test]
  fn test_revenue_months_cross_year_boundary() {
    let today = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    let months = revenue_by_month(&[], today, 6);
    let labels: Vec<_> = months.iter().map(|m| m.label.as_str()).collect();
    assert_eq!(
      labels,
      vec!["Sep 2023", "Oct 2023", "Nov 2023", "Dec 2023", "Jan 2024", "Feb 2024"]
    );
    assert!(months.iter().all(|m| m.revenue == 0.0));
  }
}
