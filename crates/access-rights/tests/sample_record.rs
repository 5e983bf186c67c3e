//! The canonical single-value record, read without any network access.

use access_rights::ddi::{extract_field, isolate_root, TYPE_OF_ACCESS};
use access_rights::vocabulary::{ApprovedTermSet, TermOrigin, VocabularyCache};
use access_rights::{decide, Verdict};

const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<OAI-PMH xmlns="http://www.openarchives.org/OAI/2.0/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
    <GetRecord>
        <record>
            <metadata>
                <codeBook xmlns="ddi:codebook:2_5" version="2.5">
                    <stdyDscr>
                        <dataAccs>
                            <typeOfAccess>Open</typeOfAccess>
                        </dataAccs>
                    </stdyDscr>
                </codeBook>
            </metadata>
        </record>
    </GetRecord>
</OAI-PMH>"#;

#[test]
fn sample_extracts_open() {
    let doc = isolate_root(SAMPLE.as_bytes()).unwrap();
    assert_eq!(extract_field(&doc, TYPE_OF_ACCESS), vec!["Open".to_string()]);
}

#[tokio::test]
async fn sample_passes_against_fallback_terms() {
    let cache = VocabularyCache::prepopulated(ApprovedTermSet::fallback());
    let approved = cache.approved_terms().await;
    assert_eq!(approved.origin(), TermOrigin::Fallback);

    let doc = isolate_root(SAMPLE.as_bytes()).unwrap();
    let values = extract_field(&doc, TYPE_OF_ACCESS);
    assert_eq!(decide(&values, &approved), Verdict::Pass);
}
