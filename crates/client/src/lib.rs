//! Client code for casefinder.
//!
//! This crate provides the vendor protocol client, the table-driven
//! extraction engine with its per-jurisdiction mapping tables, normalized
//! record types, and the search aggregation and case-annotation layer.

pub mod annotate;
pub mod extract;
pub mod paging;
pub mod records;
pub mod search;
pub mod vendor;

pub use annotate::annotate;
pub use extract::ExtractError;
pub use records::{
    Annotatable, CaseStatus, DriverDetails, DriverSummary, Keyed, LienHolder, PropertySummary, VehicleDetails,
    VehicleSummary,
};
pub use search::{
    DetailReply, MergeMode, SearchClient, SearchError, SearchReply, VehicleSearchFields, merge_results,
};
pub use vendor::{Credentials, MatchScope, MatchType, SessionCache, VendorClient, VendorConfig, VendorError};
