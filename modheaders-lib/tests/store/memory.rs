use modheaders_lib::store::{MemoryStore, RuleStore, CONFIG_KEY, STARTED_KEY};

use crate::TestResult;

#[test]
fn test_memory_store_seeded_entries() -> TestResult {
    let store = MemoryStore::with_entries([(STARTED_KEY, "on")]);
    assert_eq!(store.load(STARTED_KEY)?.as_deref(), Some("on"));
    assert!(store.load(CONFIG_KEY)?.is_none());
    Ok(())
}
