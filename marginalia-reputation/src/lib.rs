//! # marginalia-reputation
//!
//! Comment spam screening against an external reputation service.
//!
//! - [`client`]: the service capability (`check`, `submit_spam`) and its errors
//! - [`akismet`]: HTTP implementation of the Akismet REST protocol
//! - [`manager`]: owner of the single shared client, rebuilt on a timer
//! - [`classifier`]: fail-open spam/ham decisions for individual comments
//! - [`store`]: the persistence contract classification results are saved through

pub mod akismet;
pub mod classifier;
pub mod client;
pub mod manager;
pub mod store;

pub use akismet::AkismetClient;
pub use classifier::{ClassificationResult, CommentClassifier};
pub use client::{CommentParams, ReputationClient, ReputationError};
pub use manager::{ClientHandle, ClientLease, ClientManager};
pub use store::{CommentStore, JsonFileStore, StoreError};
