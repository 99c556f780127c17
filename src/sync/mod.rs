//! Keeps widgets in step with the shared profile slot.

pub mod bridge;
pub mod feed;
pub mod resolve;
pub mod selection;
pub mod store;

pub use bridge::{BridgeOptions, ChangeBridge, ChangeTrigger, IntervalTimer, Subscription};
pub use feed::{FeedStats, ProfileFeed, Waker};
pub use resolve::{coalesce, resolve_card, DataSource, PartialTestimonial, Resolved, Sources};
pub use selection::SelectionState;
pub use store::{parse_record, ProfileStore, StoreError, StoreErrorKind};
