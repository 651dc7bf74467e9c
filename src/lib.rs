//! Administrative console for a small ERP domain.
//!
//! Entity lists are held by [`store::CollectionStore`] instances that
//! re-fetch their whole collection after every mutation, and rendered
//! through the search/sort pipeline in [`query`].

pub mod config;
pub mod console;
pub mod dashboard;
pub mod db;
pub mod display;
pub mod query;
pub mod store;
pub mod types;
