//! Startup seeding from a fixtures file: a JSON array of seed payloads, read
//! once and never written back.

use std::path::Path;

use crate::errors::PreloadError;
use crate::registry::FixtureRegistry;
use crate::seed::SeedPayload;

/// Seeds every payload of the JSON array at `path` into `registry`, in file
/// order. Any invalid entry fails the whole preload before anything is stored.
pub fn preload_fixtures(path: &Path, registry: &FixtureRegistry) -> Result<usize, PreloadError> {
    let content = std::fs::read(path)?;
    let payloads: Vec<SeedPayload> = serde_json::from_slice(&content)?;

    let entries = payloads
        .into_iter()
        .enumerate()
        .map(|(index, payload)| {
            payload
                .into_entry()
                .map_err(|err| PreloadError::InvalidEntry(index, err))
        })
        .collect::<Result<Vec<_>, _>>()?;

    for entry in &entries {
        registry.seed(&entry.target(), entry.fixture.clone());
    }

    chameleon_trace::info!(
        "Preloaded {} fixtures from {}",
        entries.len(),
        path.display()
    );
    Ok(entries.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{FixtureTarget, KeyStrategy};
    use std::io::Write;

    fn write_fixtures(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("should create temp file");
        file.write_all(content.as_bytes()).expect("should write fixtures");
        file
    }

    #[test]
    fn seeds_entries_in_file_order() {
        let file = write_fixtures(
            r#"[
                {"Request": {"URL": "/a"}, "Response": {"StatusCode": 201, "Body": "one"}},
                {"Request": {"URL": "/b"}, "Response": {"Body": "two"}},
                {"Request": {"URL": "/a"}, "Response": {"StatusCode": 202, "Body": "three"}}
            ]"#,
        );
        let registry = FixtureRegistry::new(KeyStrategy::Path);

        let count = preload_fixtures(file.path(), &registry).expect("should preload");

        assert_eq!(count, 3);
        assert_eq!(registry.len(), 2);
        let a = registry.lookup(&FixtureTarget::path("/a")).expect("a present");
        assert_eq!(a.status.as_u16(), 202);
        assert_eq!(&a.body[..], b"three");
    }

    #[test]
    fn invalid_entry_stores_nothing() {
        let file = write_fixtures(
            r#"[
                {"Request": {"URL": "/ok"}},
                {"Request": {"URL": "/bad"}, "Response": {"StatusCode": 12}}
            ]"#,
        );
        let registry = FixtureRegistry::new(KeyStrategy::Path);

        let err = preload_fixtures(file.path(), &registry).expect_err("should fail");
        assert!(matches!(err, PreloadError::InvalidEntry(1, _)));
        assert!(registry.is_empty());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let registry = FixtureRegistry::new(KeyStrategy::Path);
        let err = preload_fixtures(Path::new("/no/such/fixtures.json"), &registry)
            .expect_err("should fail");
        assert!(matches!(err, PreloadError::IOError(_)));
    }

    #[test]
    fn non_array_documents_are_malformed() {
        let file = write_fixtures(r#"{"Request": {"URL": "/a"}}"#);
        let registry = FixtureRegistry::new(KeyStrategy::Path);
        let err = preload_fixtures(file.path(), &registry).expect_err("should fail");
        assert!(matches!(err, PreloadError::Malformed(_)));
    }
}
