//! Domain models for the yamweb backend.
//!
//! These are the JSON shapes the site exchanges with the browser. The
//! store-side representations (with native `ObjectId` keys) live in
//! `db::mongo` and convert into these.

pub mod food;
pub mod purchase;
pub mod results;

pub use food::{FoodDetails, FoodItem, NewFoodItem, OrderUpdate};
pub use purchase::{PurchaseDetails, PurchaseRecord};
pub use results::{CountResponse, DeleteSummary, InsertSummary, UpdateSummary};
