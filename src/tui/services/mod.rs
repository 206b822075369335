//! Background services used by the controller.

pub mod http;

pub use http::{
    ApiClient, ApiError, ApiEvent, ApiService, DeleteReceipt, Listing, SaveReceipt, StatsSnapshot,
};
