//! # Commands
//!
//! Every operation the shell can perform, as plain async functions.
//!
//! ```text
//! commands/
//! ├── auth.rs       ◄─── Sign-up, login, admin bootstrap
//! ├── inventory.rs  ◄─── Item CRUD, low-stock view
//! ├── sale.rs       ◄─── Recording sales, sales history
//! └── report.rs     ◄─── Analytics and inventory export
//! ```
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  shell line "sell 3 2 480"                                             │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  commands::sale::record_sale(                                          │
//! │      db: &Database,        ◄── shared pool                             │
//! │      session: &Session,    ◄── proof of sign-in                        │
//! │      item_id, quantity, sale_price                                     │
//! │  ) -> Result<Sale, ApiError>                                           │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  shell renders the value, or prints the ApiError                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Inputs are validated here, before anything reaches the repositories.

pub mod auth;
pub mod inventory;
pub mod report;
pub mod sale;
