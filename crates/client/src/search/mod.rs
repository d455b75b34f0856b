//! Caller-facing search operations.
//!
//! Composes the vendor client, the bounded page walker, the extraction
//! engine, and the merge algebra into the operations the web layer calls.
//! Ordinary failures such as vendor errors and transport trouble
//! come back as an unsuccessful reply with a human-readable message;
//! only configuration-class errors (a jurisdiction nobody wrote a
//! mapping table for) surface as `Err`.

pub mod merge;

pub use merge::{MergeMode, merge_results};

use crate::extract::ExtractError;
use crate::paging::fetch_bounded;
use crate::records::{Annotatable, DriverDetails, DriverSummary, PropertySummary, VehicleDetails, VehicleSummary};
use crate::vendor::response::result_records;
use crate::vendor::{Credentials, DetailQuery, MatchScope, MatchType, SearchQuery, VendorClient, VendorError};
use casefinder_core::{AppConfig, RawNode, StoreDb};
use std::collections::BTreeMap;

/// Configuration-class errors: the search itself cannot be attempted or
/// its results cannot be normalized. Everything recoverable is a reply.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Outcome of a search operation.
#[derive(Debug, Clone)]
pub struct SearchReply<R> {
    pub success: bool,
    pub message: String,
    pub records: Vec<R>,
    /// True when the page ceiling truncated the result walk; the result
    /// set may be incomplete and the user should be told so.
    pub truncated: bool,
}

impl<R> SearchReply<R> {
    fn failure(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into(), records: Vec::new(), truncated: false }
    }

    fn found(records: Vec<R>, truncated: bool) -> Self {
        let message = if truncated {
            format!(
                "Found {} matching records, but the search was cut off at the page limit; \
                 results may be incomplete. Narrower criteria will give a complete set.",
                records.len()
            )
        } else if records.is_empty() {
            "No matching records.".to_string()
        } else {
            format!("Found {} matching records.", records.len())
        };
        Self { success: true, message, records, truncated }
    }

    fn no_match() -> Self {
        Self::found(Vec::new(), false)
    }
}

/// Outcome of a details operation.
#[derive(Debug, Clone)]
pub struct DetailReply<R> {
    pub success: bool,
    pub message: String,
    pub record: Option<R>,
}

impl<R> DetailReply<R> {
    fn failure(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into(), record: None }
    }

    fn found(record: R) -> Self {
        Self { success: true, message: "OK".to_string(), record: Some(record) }
    }
}

/// Form fields of a multi-criteria vehicle search.
///
/// A field that is absent or submitted empty contributes no sub-search;
/// only fields with actual terms participate in the merge.
#[derive(Debug, Clone, Default)]
pub struct VehicleSearchFields {
    pub name: Option<String>,
    pub plate: Option<String>,
    pub vin: Option<String>,
}

fn non_empty_subsearches(fields: &VehicleSearchFields) -> Vec<(MatchScope, &str)> {
    [
        (MatchScope::Name, &fields.name),
        (MatchScope::Plate, &fields.plate),
        (MatchScope::Vin, &fields.vin),
    ]
    .into_iter()
    .filter_map(|(scope, terms)| {
        let terms = terms.as_deref()?.trim();
        (!terms.is_empty()).then_some((scope, terms))
    })
    .collect()
}

fn vehicle_db(state: &str) -> String {
    format!("grp_dmv_{}", state.to_lowercase())
}

fn driver_db(state: &str) -> String {
    format!("grp_dl_{}", state.to_lowercase())
}

fn property_db(state: &str) -> String {
    format!("grp_tax_{}", state.to_lowercase())
}

enum PagedOutcome {
    Pages(Vec<RawNode>, bool),
    NoMatch,
}

/// High-level search client over one vendor and one store.
#[derive(Debug, Clone)]
pub struct SearchClient {
    vendor: VendorClient,
    store: StoreDb,
    max_pages: usize,
}

impl SearchClient {
    pub fn new(vendor: VendorClient, store: StoreDb, config: &AppConfig) -> Self {
        Self { vendor, store, max_pages: config.max_result_pages }
    }

    /// The underlying store, for case mutations alongside searches.
    pub fn store(&self) -> &StoreDb {
        &self.store
    }

    /// Search motor-vehicle records on one criterion.
    pub async fn search_vehicles(
        &self, credentials: &Credentials, terms: &str, scope: MatchScope, state: &str,
    ) -> Result<SearchReply<VehicleSummary>, SearchError> {
        let query = SearchQuery::new(vehicle_db(state), terms, MatchType::All, scope);
        let source = self.vendor.source().to_string();
        let state = state.to_uppercase();
        self.summary_search(credentials, query, |node| VehicleSummary::from_raw(node, &source, &state))
            .await
    }

    /// Search motor-vehicle records on several criteria at once, merged
    /// conjunctively or disjunctively.
    pub async fn search_vehicles_multi(
        &self, credentials: &Credentials, fields: &VehicleSearchFields, mode: MergeMode, state: &str,
    ) -> Result<SearchReply<VehicleSummary>, SearchError> {
        let subsearches = non_empty_subsearches(fields);
        if subsearches.is_empty() {
            return Ok(SearchReply::failure("No search criteria provided."));
        }

        let mut merged: Option<BTreeMap<String, VehicleSummary>> = None;
        let mut truncated = false;

        for (scope, terms) in subsearches {
            let reply = self.search_vehicles(credentials, terms, scope, state).await?;
            if !reply.success {
                return Ok(SearchReply::failure(reply.message));
            }
            truncated |= reply.truncated;
            merged = Some(merge_results(mode, merged, reply.records));
        }

        let records = merged.unwrap_or_default().into_values().collect();
        Ok(SearchReply::found(records, truncated))
    }

    /// Search driver's-license records.
    pub async fn search_drivers(
        &self, credentials: &Credentials, terms: &str, scope: MatchScope, state: &str,
    ) -> Result<SearchReply<DriverSummary>, SearchError> {
        let query = SearchQuery::new(driver_db(state), terms, MatchType::All, scope);
        let source = self.vendor.source().to_string();
        let state = state.to_uppercase();
        self.summary_search(credentials, query, |node| DriverSummary::from_raw(node, &source, &state))
            .await
    }

    /// Search real-property tax records across a state.
    ///
    /// Each record's jurisdiction is derived from its own attribution
    /// text, so results can span counties with different schemas.
    pub async fn search_properties(
        &self, credentials: &Credentials, terms: &str, match_type: MatchType, scope: MatchScope, state: &str,
    ) -> Result<SearchReply<PropertySummary>, SearchError> {
        let query = SearchQuery::new(property_db(state), terms, match_type, scope);
        let source = self.vendor.source().to_string();
        self.summary_search(credentials, query, |node| PropertySummary::from_raw(node, &source))
            .await
    }

    /// Fetch the full registration record behind one vehicle summary.
    pub async fn vehicle_details(
        &self, credentials: &Credentials, db: &str, ed: &str, rec: &str, state: &str,
    ) -> Result<DetailReply<VehicleDetails>, SearchError> {
        let query = DetailQuery::new(db, ed, rec);
        match self.vendor.fetch_details(&self.store, credentials, &query).await {
            Ok(root) => {
                let details = VehicleDetails::from_raw(&root, self.vendor.source(), &state.to_uppercase())?;
                Ok(DetailReply::found(details))
            }
            Err(e) => {
                tracing::warn!(db, rec, error = %e, "vehicle details fetch failed");
                Ok(DetailReply::failure(e.to_string()))
            }
        }
    }

    /// Fetch the full license record behind one driver summary.
    pub async fn driver_details(
        &self, credentials: &Credentials, db: &str, ed: &str, rec: &str, state: &str,
    ) -> Result<DetailReply<DriverDetails>, SearchError> {
        let query = DetailQuery::new(db, ed, rec);
        match self.vendor.fetch_details(&self.store, credentials, &query).await {
            Ok(root) => {
                let details = DriverDetails::from_raw(&root, self.vendor.source(), &state.to_uppercase())?;
                Ok(DetailReply::found(details))
            }
            Err(e) => {
                tracing::warn!(db, rec, error = %e, "driver details fetch failed");
                Ok(DetailReply::failure(e.to_string()))
            }
        }
    }

    /// Mark each result's case status against one case category.
    pub async fn annotate_case(
        &self, results: &mut [impl Annotatable], case_id: &str, category: &str,
    ) -> Result<(), casefinder_core::Error> {
        let sets = self.store.item_sets(case_id, category).await?;
        crate::annotate::annotate(results, &sets);
        Ok(())
    }

    /// Walk every page of one query and normalize the records.
    async fn summary_search<R>(
        &self, credentials: &Credentials, query: SearchQuery,
        parse: impl Fn(&RawNode) -> Result<R, ExtractError>,
    ) -> Result<SearchReply<R>, SearchError> {
        match self.fetch_all(credentials, &query).await {
            Ok(PagedOutcome::NoMatch) => Ok(SearchReply::no_match()),
            Ok(PagedOutcome::Pages(pages, truncated)) => {
                let mut records = Vec::new();
                for page in &pages {
                    for node in result_records(page) {
                        records.push(parse(node)?);
                    }
                }
                Ok(SearchReply::found(records, truncated))
            }
            Err(e) => {
                tracing::warn!(db = %query.db, error = %e, retryable = e.is_retryable(), "search failed");
                Ok(SearchReply::failure(e.to_string()))
            }
        }
    }

    async fn fetch_all(&self, credentials: &Credentials, query: &SearchQuery) -> Result<PagedOutcome, VendorError> {
        let result = fetch_bounded(
            |page| {
                let paged_query = query.with_page(page);
                async move { self.vendor.fetch_page(&self.store, credentials, &paged_query).await }
            },
            self.max_pages,
        )
        .await;

        match result {
            Ok(paged) => Ok(PagedOutcome::Pages(paged.pages, paged.truncated)),
            Err(VendorError::NoMatch) => Ok(PagedOutcome::NoMatch),
            Err(e) => Err(e),
        }
    }
}
