//! Status code and label mappings.

const RED: &str = "bg-red-100 text-red-800";
const GREEN: &str = "bg-green-100 text-green-800";
const BLUE: &str = "bg-blue-100 text-blue-800";
const YELLOW: &str = "bg-yellow-100 text-yellow-800";
const PURPLE: &str = "bg-purple-100 text-purple-800";
const GRAY: &str = "bg-gray-100 text-gray-800";

/// Lifecycle of a purchase order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PurchaseOrderStatus {
  Cancelled,
  Received,
  Ordered,
  UnderReview,
  Unknown(i64),
}

impl PurchaseOrderStatus {
  /// Code shown when a purchase order carries no status at all.
  ///
  /// Only an absent value takes the default; a literal 0 stays Cancelled.
  pub const DEFAULT_CODE: i64 = 3;

  pub fn from_code(code: i64) -> Self {
    match code {
      0 => Self::Cancelled,
      1 => Self::Received,
      2 => Self::Ordered,
      3 => Self::UnderReview,
      other => Self::Unknown(other),
    }
  }

  pub fn from_optional(code: Option<i64>) -> Self {
    Self::from_code(code.unwrap_or(Self::DEFAULT_CODE))
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::Cancelled => "Cancelled",
      Self::Received => "Received",
      Self::Ordered => "Ordered",
      Self::UnderReview => "Under Review",
      Self::Unknown(_) => "Unknown",
    }
  }

  pub fn badge_class(self) -> &'static str {
    match self {
      Self::Cancelled => RED,
      Self::Received => GREEN,
      Self::Ordered => BLUE,
      Self::UnderReview => YELLOW,
      Self::Unknown(_) => GRAY,
    }
  }

  /// Still waiting on delivery
  pub fn is_open(self) -> bool {
    matches!(self, Self::Ordered | Self::UnderReview)
  }
}

pub fn purchase_order_status_label(code: i64) -> &'static str {
  PurchaseOrderStatus::from_code(code).label()
}

pub fn purchase_order_status_class(code: i64) -> &'static str {
  PurchaseOrderStatus::from_code(code).badge_class()
}

/// Customer and vendor activity flag: 1 is active, anything else inactive.
pub fn active_label(status: Option<i64>) -> &'static str {
  if status == Some(1) {
    "Active"
  } else {
    "Inactive"
  }
}

pub fn active_class(status: Option<i64>) -> &'static str {
  if status == Some(1) {
    GREEN
  } else {
    RED
  }
}

pub fn vendor_type_label(vendor_type: Option<i64>) -> &'static str {
  if vendor_type == Some(1) {
    "Supplier"
  } else {
    "Contractor"
  }
}

pub fn vendor_type_class(vendor_type: Option<i64>) -> &'static str {
  if vendor_type == Some(1) {
    BLUE
  } else {
    PURPLE
  }
}

pub const DEFAULT_PROJECT_STATUS: &str = "Active";

pub fn project_status_class(status: &str) -> &'static str {
  match status {
    "Active" => GREEN,
    "On Hold" => YELLOW,
    "Completed" => BLUE,
    "Cancelled" => RED,
    _ => GRAY,
  }
}

pub const DEFAULT_INVOICE_STATUS: &str = "Pending";

pub fn invoice_status_class(status: &str) -> &'static str {
  match status {
    "Paid" => GREEN,
    "Pending" => YELLOW,
    "Overdue" => RED,
    "Cancelled" => GRAY,
    _ => GRAY,
  }
}

/// Header title for a route path.
pub fn page_title(path: &str) -> &'static str {
  match path {
    "/" => "Dashboard",
    "/customers" => "Customer Management",
    "/projects" => "Project Management",
    "/vendors" => "Vendor Management",
    "/employees" => "Employee Management",
    "/purchase-orders" => "Purchase Order Management",
    "/invoices" => "Invoice Management",
    _ => "Modern ERP",
  }
}
