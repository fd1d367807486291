//! Rule system for block to Markdown conversion.
//!
//! Every block first goes through its built-in handling. Custom rules are then
//! checked in insertion order and the first match replaces that output.

mod rule;

pub use rule::{Filter, Matched, ReplacementFn, Rule};

use blockdown_core::{Block, ExportOptions};
use indexmap::IndexMap;

/// Collection of rules for conversion
pub struct Rules {
    /// Custom rules added by the user (checked first)
    custom_rules: IndexMap<String, Rule>,
    /// Remove rules (drop the block and its subtree)
    remove_rules: Vec<Filter>,
}

impl Rules {
    /// Create a new Rules instance with only the built-in rendering
    pub fn new() -> Self {
        Self {
            custom_rules: IndexMap::new(),
            remove_rules: Vec::new(),
        }
    }

    /// Add a custom rule; a rule with the same key is replaced in place
    pub fn add(&mut self, key: &str, rule: Rule) {
        self.custom_rules.insert(key.to_string(), rule);
    }

    /// Add a remove filter
    pub fn remove(&mut self, filter: Filter) {
        self.remove_rules.push(filter);
    }

    /// Find the custom rule for a block, if any
    pub fn for_block(&self, block: &Block) -> Option<&Rule> {
        self.custom_rules
            .values()
            .find(|rule| rule.filter.matches(block))
    }

    /// Check if a block should be dropped entirely; custom rules win
    pub fn should_remove(&self, block: &Block) -> bool {
        if self.for_block(block).is_some() {
            return false;
        }
        self.remove_rules.iter().any(|filter| filter.matches(block))
    }

    /// Final fragment for a block given its built-in output
    pub fn apply(&self, block: &Block, default: String, options: &ExportOptions) -> String {
        match self.for_block(block) {
            Some(rule) => rule.apply(block, &default, options),
            None => default,
        }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::new()
    }
}
