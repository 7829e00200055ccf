mod common;

use common::TestResult;
use vitae::types::Resume;

#[test]
fn document_survives_a_json_round_trip_unchanged() -> TestResult {
    let resume = Resume::sample();
    let json = serde_json::to_string_pretty(&resume)?;
    let reimported: Resume = serde_json::from_str(&json)?;
    assert_eq!(reimported, resume);
    Ok(())
}

#[test]
fn shipped_sample_data_matches_the_document_model() -> TestResult {
    let raw = std::fs::read_to_string("data/resume.json")?;
    let parsed: Resume = serde_json::from_str(&raw)?;
    assert_eq!(parsed, Resume::sample());
    Ok(())
}

#[test]
fn reexported_sample_data_is_stable() -> TestResult {
    let raw = std::fs::read_to_string("data/resume.json")?;
    let parsed: Resume = serde_json::from_str(&raw)?;
    let reexported = serde_json::to_string(&parsed)?;
    let reparsed: Resume = serde_json::from_str(&reexported)?;
    assert_eq!(reparsed, parsed);
    Ok(())
}
