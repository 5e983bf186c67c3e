// Copyright 2026 CESSDA ERIC
// SPDX-License-Identifier: Apache-2.0

//! Access Rights compliance check for CESSDA Data Catalogue records.
//!
//! Given a catalogue detail URL, the checker fetches the record's DDI 2.5
//! metadata over OAI-PMH, pulls out every `typeOfAccess` declaration and
//! compares it against the CESSDA Access Rights vocabulary. The outcome is a
//! [`Verdict`]: `pass`, `fail` or `indeterminate`.

pub mod check;
pub mod config;
pub mod ddi;
pub mod error;
pub mod fetch;
pub mod identifier;
pub mod logging;
pub mod verdict;
pub mod vocabulary;

pub use check::AccessRightsChecker;
pub use config::CheckerConfig;
pub use error::{CheckError, FetchError, VocabularyError};
pub use identifier::RecordIdentifier;
pub use verdict::{decide, Verdict};
pub use vocabulary::{ApprovedTermSet, HttpTermSource, TermOrigin, TermSource, VocabularyCache};
