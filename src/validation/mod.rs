/*!
 * Validation module for translatable content.
 *
 * # Architecture
 *
 * - `unique_translation`: locale-scoped uniqueness rule
 * - `service`: runs rules over a form submission and collects errors
 */

pub mod unique_translation;
pub mod service;

// Re-export main types
pub use service::{ValidationErrors, ValidationService};
pub use unique_translation::{RuleOutcome, UniqueTranslationRule, DEFAULT_MESSAGE};
