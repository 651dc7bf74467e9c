mod customer;
mod employee;
mod entity;
mod invoice;
mod project;
mod purchase_order;
mod vendor;

pub use customer::Customer;
pub use employee::Employee;
pub use entity::{Entity, EntityKind, UnknownEntity, SYSTEM_FIELDS};
pub use invoice::Invoice;
pub use project::Project;
pub use purchase_order::PurchaseOrder;
pub use vendor::Vendor;
