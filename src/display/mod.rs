//! Presentation rules shared by the console tables and the dashboard.

mod format;
mod status;

pub use format::{
  format_currency, format_date, format_phone, is_overdue, parse_date, CurrencyFormat, Locale,
  DEFAULT_CURRENCY,
};
pub use status::{
  active_class, active_label, invoice_status_class, page_title, project_status_class,
  purchase_order_status_class, purchase_order_status_label, vendor_type_class, vendor_type_label,
  PurchaseOrderStatus, DEFAULT_INVOICE_STATUS, DEFAULT_PROJECT_STATUS,
};
