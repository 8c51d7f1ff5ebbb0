//! The quiz's sampling universe: a fixed list of card names.
//!
//! The list is embedded at compile time, one name per line. Repeated names
//! are kept, which makes those cards proportionally more likely to come up.

use rand::Rng;
use thiserror::Error;

const CUBE_LIST: &str = include_str!("cube.txt");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("card catalog must contain at least one name")]
    Empty,
}

/// Immutable, non-empty list of card names.
#[derive(Debug, Clone)]
pub struct CardCatalog {
    names: Vec<String>,
}

impl CardCatalog {
    pub fn new<I, S>(names: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self { names })
    }

    /// The embedded cube list.
    pub fn cube() -> Result<Self, CatalogError> {
        Self::new(
            CUBE_LIST
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty()),
        )
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Uniform over list positions, using the thread-local generator.
    pub fn pick_random(&self) -> &str {
        self.pick_with(&mut rand::thread_rng())
    }

    pub fn pick_with<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        // `new` guarantees at least one entry
        &self.names[rng.gen_range(0..self.names.len())]
    }
}
