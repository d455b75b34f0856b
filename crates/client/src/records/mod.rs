//! Normalized record kinds.
//!
//! One concrete struct per record kind (driver, vehicle, real property,
//! lien holder), each a flat set of string attributes populated from a
//! raw vendor tree through the kind's mapping tables. Summaries carry the
//! `(source, db, ed, rec)` compound key of the underlying raw record;
//! `key()` is the storage/lookup form of it and stays stable across
//! repeated queries, which the merge algebra and case item sets depend
//! on.

pub mod driver;
pub mod lien;
pub mod property;
pub mod vehicle;

pub use driver::{DriverDetails, DriverSummary};
pub use lien::LienHolder;
pub use property::PropertySummary;
pub use vehicle::{VehicleDetails, VehicleSummary};

use serde::{Deserialize, Serialize};

/// Inclusion status of a result item against the user's active case.
///
/// Variant order matches the display sort: included items first, then
/// unreviewed, then excluded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CaseStatus {
    Included,
    #[default]
    Neither,
    Excluded,
}

impl CaseStatus {
    /// One-letter code used by the display layer.
    pub fn code(self) -> char {
        match self {
            CaseStatus::Included => 'I',
            CaseStatus::Excluded => 'X',
            CaseStatus::Neither => 'N',
        }
    }
}

/// A record addressable by its vendor storage key.
pub trait Keyed {
    /// Storage/lookup key: `source:db.ed.rec`.
    fn key(&self) -> String;
}

/// A result item that can be marked against a case.
pub trait Annotatable: Keyed {
    fn set_case_status(&mut self, status: CaseStatus);
}

pub(crate) fn record_key(source: &str, db: &str, ed: &str, rec: &str) -> String {
    format!("{source}:{db}.{ed}.{rec}")
}
