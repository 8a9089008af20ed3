//! # Handler Module
//!
//! HTTP handlers, one module per dashboard area.
//!
//! ```text
//! handlers/
//! ├── auth.rs      ◄─── login / logout / me
//! ├── customer.rs  ◄─── admin customer list, registration, profile edits
//! ├── pickup.rs    ◄─── request / assign / complete / proof upload
//! ├── bill.rs      ◄─── billing list, mark paid, payment proof
//! └── summary.rs   ◄─── admin summary rollup
//! ```
//!
//! Every handler resolves the caller through the [`crate::auth::CurrentUser`]
//! extractor and scopes what it reads or mutates by role.

pub mod auth;
pub mod bill;
pub mod customer;
pub mod pickup;
pub mod summary;
