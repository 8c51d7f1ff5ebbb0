pub mod catalog;
pub mod config;
pub mod handlers;
pub mod quiz;
pub mod services;
pub mod startup;

use catalog::CardCatalog;
use services::{CardDescriber, CardLookup};
use std::sync::Arc;

/// Shared, read-only application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CardCatalog>,
    pub card_lookup: Arc<dyn CardLookup>,
    pub describer: Arc<dyn CardDescriber>,
}

impl AppState {
    pub fn new(
        catalog: Arc<CardCatalog>,
        card_lookup: Arc<dyn CardLookup>,
        describer: Arc<dyn CardDescriber>,
    ) -> Self {
        Self {
            catalog,
            card_lookup,
            describer,
        }
    }
}
