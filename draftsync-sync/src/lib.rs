//! Draft-to-remote sync orchestration.
//!
//! Takes a stream of drafts (desired state) and reconciles them with what a
//! remote system already stores: missing entities are created, existing
//! ones are updated with the minimal ordered list of update actions, and
//! entities that already match are left alone.
//!
//! # Architecture
//!
//! - **Validator**: drops absent, keyless or malformed drafts
//! - **Matcher**: pairs drafts with fetched entities by key
//! - **Diff engine** (`draftsync-diff`): computes the update actions
//! - **Orchestrator**: batches, concurrency and conflict retry
//! - **Statistics**: run-scoped counters and summary
//!
//! ## Sync Process
//!
//! 1. **Validate**: filter the batch and collect the draft keys
//! 2. **Fetch**: load existing entities for those keys
//! 3. **Match**: split into creates and updates
//! 4. **Apply**: create or diff-and-update every record concurrently
//! 5. **Retry**: on a concurrent modification, re-fetch and update once more
//!
//! # Example
//!
//! ```
//! use draftsync_sync::mock::InMemoryService;
//! use draftsync_sync::{ChannelKind, ResourceSync, SyncOptions};
//! use draftsync_types::ChannelDraft;
//!
//! # tokio_test_block_on(async {
//! let options = SyncOptions::<ChannelKind>::builder()
//!     .batch_size(20)
//!     .build()
//!     .expect("valid options");
//! let sync = ResourceSync::new(InMemoryService::<ChannelKind>::new(), options);
//!
//! let stats = sync.sync(vec![ChannelDraft::new("berlin")]).await;
//! assert_eq!(stats.created(), 1);
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

mod config;
mod error;
mod event;
mod kind;
mod matcher;
pub mod mock;
mod service;
mod statistics;
mod sync;
mod validator;

pub use config::{
    AttributeConstraint, BeforeCreate, BeforeUpdate, DEFAULT_BATCH_SIZE, EventCallback,
    SyncConfig, SyncOptions, SyncOptionsBuilder,
};
pub use error::{SyncError, SyncResult};
pub use event::{Severity, SyncEvent};
pub use kind::{ActionBuilder, ChannelKind, ProductKind, ResourceKind, SyncResource, ValidateDraft};
pub use matcher::{Matched, match_drafts};
pub use service::ResourceService;
pub use statistics::{StatisticsSnapshot, SyncStatistics};
pub use sync::ResourceSync;
pub use validator::{ValidatedBatch, validate_batch};

/// Syncs product drafts.
pub type ProductSync<S> = ResourceSync<ProductKind, S>;

/// Syncs channel drafts.
pub type ChannelSync<S> = ResourceSync<ChannelKind, S>;
