use serde_json::{json, Value};
use erpdesk::query::{
  filter_records, locale_cmp, sort_records, ListQuery, ListSpec, QueryError, SortDirection,
  SortState,
};
use erpdesk::types::{Customer, Entity, Invoice, PurchaseOrder};

fn customers() -> Vec<Customer> {
  serde_json::from_value(json!([
    {"id": 1, "name": "Zenith Ltd", "contact_person": "Ayla", "email": "info@zenith.io", "phone": "5550001111"},
    {"id": 2, "name": "acme corp", "email": "sales@acme.com"},
    {"id": 3, "name": "Beta Works", "contact_person": "Zoe Acme"},
    {"id": 4, "name": "Ölçü Makina"},
  ]))
  .unwrap()
}

fn names(rows: &[Customer]) -> Vec<&str> {
  rows.iter().map(|c| c.name.as_str()).collect()
}

#[test]
fn test_search_matches_any_searchable_field_case_insensitively() {
  let mut query = ListQuery::new(Customer::LIST);
  query.set_search("ACME");
  let rows = query.apply(&customers());
  // Default sort is name ascending
  assert_eq!(names(&rows), vec!["acme corp", "Beta Works"]);
}

#[test]
fn test_search_ignores_non_searchable_fields() {
  let mut query = ListQuery::new(Customer::LIST);
  query.set_search("5550001111");
  assert!(query.apply(&customers()).is_empty());
}

#[test]
fn test_empty_search_keeps_records_with_missing_fields() {
  let query = ListQuery::new(Customer::LIST);
  let rows = query.apply(&customers());
  assert_eq!(rows.len(), 4);
  assert_eq!(
    names(&rows),
    vec!["acme corp", "Beta Works", "Ölçü Makina", "Zenith Ltd"]
  );
}

#[test]
fn test_transform_is_idempotent() {
  let mut query = ListQuery::new(Customer::LIST);
  query.set_search("a");
  query.select_sort("email").unwrap();
  let once = query.apply(&customers());
  let twice = query.apply(&once);
  assert_eq!(once, twice);
}

#[test]
fn test_input_is_not_mutated() {
  let input = customers();
  let before = input.clone();
  let mut query = ListQuery::new(Customer::LIST);
  query.select_sort("name").unwrap();
  let _ = query.apply(&input);
  assert_eq!(input, before);
}

#[test]
fn test_missing_values_sort_first_ascending_and_last_descending() {
  let mut query = ListQuery::new(Customer::LIST);
  query.select_sort("contact_person").unwrap();
  let asc = query.apply(&customers());
  assert_eq!(asc[0].contact_person, None);
  assert_eq!(asc[1].contact_person, None);
  assert_eq!(asc[2].contact_person.as_deref(), Some("Ayla"));
  assert_eq!(asc[3].contact_person.as_deref(), Some("Zoe Acme"));

  query.select_sort("contact_person").unwrap();
  let desc = query.apply(&customers());
  assert_eq!(desc[0].contact_person.as_deref(), Some("Zoe Acme"));
  assert_eq!(desc[3].contact_person, None);
}

#[test]
fn test_sort_is_stable_for_equal_keys() {
  let mut query = ListQuery::new(Customer::LIST);
  query.select_sort("contact_person").unwrap();
  let asc = query.apply(&customers());
  // ids 2 and 4 both lack a contact person and keep their input order
  assert_eq!(asc[0].id, 2);
  assert_eq!(asc[1].id, 4);

  query.select_sort("contact_person").unwrap();
  let desc = query.apply(&customers());
  assert_eq!(desc[2].id, 2);
  assert_eq!(desc[3].id, 4);
}

#[test]
fn test_numbers_compare_as_text() {
  let orders: Vec<PurchaseOrder> = serde_json::from_value(json!([
    {"id": 1, "project_id": 1, "vendor_id": 1, "amount": 200.0},
    {"id": 2, "project_id": 1, "vendor_id": 1, "amount": 1500.0},
    {"id": 3, "project_id": 1, "vendor_id": 1, "amount": 30.5},
  ]))
  .unwrap();
  let mut query = ListQuery::new(PurchaseOrder::LIST);
  query.select_sort("amount").unwrap();
  let ids: Vec<i64> = query.apply(&orders).iter().map(|po| po.id).collect();
  assert_eq!(ids, vec![2, 1, 3]);
}

#[test]
fn test_toggle_rule() {
  let mut query = ListQuery::new(Invoice::LIST);
  assert_eq!(
    query.sort(),
    &SortState::new("invoice_date", SortDirection::Desc)
  );

  // Same field flips
  query.select_sort("invoice_date").unwrap();
  assert_eq!(query.sort().direction, SortDirection::Asc);

  // New field resets to ascending
  query.select_sort("amount").unwrap();
  assert_eq!(query.sort(), &SortState::new("amount", SortDirection::Asc));
  query.select_sort("amount").unwrap();
  assert_eq!(query.sort(), &SortState::new("amount", SortDirection::Desc));
}

#[test]
fn test_unsortable_field_is_rejected() {
  let mut query = ListQuery::new(PurchaseOrder::LIST);
  let before = query.sort().clone();
  let err = query.select_sort("vendor_name").unwrap_err();
  assert_eq!(
    err,
    QueryError::UnsortableField {
      field: "vendor_name".to_string(),
      allowed: vec!["amount", "created_at"],
    }
  );
  assert_eq!(query.sort(), &before);
  assert!(err.to_string().contains("amount, created_at"));
}

#[test]
fn test_json_rows_with_explicit_configuration() {
  const RANKED: ListSpec = ListSpec {
    searchable: &["title"],
    sortable: &["rank"],
    default_field: "rank",
    default_direction: SortDirection::Asc,
  };
  let rows: Vec<serde_json::Map<String, Value>> = serde_json::from_value(json!([
    {"title": "Gamma", "rank": 3},
    {"title": "alpha", "rank": 1},
    {"title": "Beta", "rank": null},
  ]))
  .unwrap();

  let query = ListQuery::new(RANKED);
  let ranked: Vec<_> = query.apply(&rows).iter().map(|r| r["title"].clone()).collect();
  assert_eq!(ranked, vec![json!("Beta"), json!("alpha"), json!("Gamma")]);

  let found = filter_records(&rows, RANKED.searchable, "ALP");
  assert_eq!(found.len(), 1);
}

#[test]
fn test_free_functions_compose() {
  let input = customers();
  let mut visible = filter_records(&input, Customer::LIST.searchable, "");
  sort_records(&mut visible, &SortState::new("name", SortDirection::Desc));
  let ids: Vec<i64> = visible.iter().map(|c| c.id).collect();
  assert_eq!(ids, vec![1, 4, 3, 2]);
}

#[test]
fn test_locale_order_of_names() {
  let mut names = vec!["cherry", "Banana", "apple", "Äpfel", "banana"];
  names.sort_by(|a, b| locale_cmp(a, b));
  assert_eq!(names, vec!["Äpfel", "apple", "banana", "Banana", "cherry"]);
}
