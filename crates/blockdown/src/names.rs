//! Output file names for discovered pages.

use std::collections::HashMap;

use blockdown_core::{sanitize_file_name, NameCollision};
use tracing::warn;

/// Assigns each page identifier a stable Markdown file name.
///
/// A page keeps the first name it was given, however many times it is
/// discovered. Under [`NameCollision::Disambiguate`] no two identifiers share
/// a name.
#[derive(Debug, Default)]
pub struct PageNames {
    policy: NameCollision,
    by_id: HashMap<String, String>,
    owners: HashMap<String, String>,
}

impl PageNames {
    pub fn new(policy: NameCollision) -> Self {
        Self {
            policy,
            by_id: HashMap::new(),
            owners: HashMap::new(),
        }
    }

    /// Claim a fixed file name (the root's `index.md`)
    pub fn reserve(&mut self, id: &str, file_name: &str) {
        self.by_id.insert(id.to_string(), file_name.to_string());
        self.owners.insert(file_name.to_string(), id.to_string());
    }

    /// File name for a page, assigning one from its title on first sight
    pub fn assign(&mut self, id: &str, title: &str) -> String {
        if let Some(existing) = self.by_id.get(id) {
            return existing.clone();
        }

        let stem = sanitize_file_name(title);
        let mut file_name = format!("{}.md", stem);

        if let Some(owner) = self.owners.get(&file_name) {
            match self.policy {
                NameCollision::Overwrite => {
                    warn!(file = %file_name, page = %id, other = %owner, "file name shared by two pages");
                }
                NameCollision::Disambiguate => {
                    file_name = self.disambiguate(&stem, id);
                    warn!(page = %id, file = %file_name, "file name collision, renamed");
                }
            }
        }

        self.by_id.insert(id.to_string(), file_name.clone());
        self.owners.entry(file_name.clone()).or_insert_with(|| id.to_string());
        file_name
    }

    fn disambiguate(&self, stem: &str, id: &str) -> String {
        let compact: String = id.chars().filter(|c| *c != '-').collect();
        let short: String = compact.chars().take(8).collect();

        let candidate = format!("{}_{}.md", stem, short);
        if !self.owners.contains_key(&candidate) {
            return candidate;
        }
        format!("{}_{}.md", stem, compact)
    }
}
