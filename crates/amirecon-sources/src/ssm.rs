//! Parameter-store queries through the `aws` command line.
//!
//! Parameters are listed recursively below the Bottlerocket prefix, page by
//! page, and only `.../image_id` parameters are kept. Names are stored
//! without their leading `/` so they line up with translated paths.

use std::path::PathBuf;

use amirecon_common::constants::IMAGE_ID_LEAF;
use amirecon_common::error::Result;
use amirecon_common::types::Region;
use amirecon_core::mapping::KeyMapping;
use amirecon_core::reconcile::ParameterSource;
use serde::Deserialize;

use crate::aws;
use crate::snapshot::SnapshotCache;

/// One page of `get-parameters-by-path` output.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ParametersPage {
    /// Parameters returned on this page.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Token for the following page, if any.
    pub next_token: Option<String>,
}

/// A single parameter.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Parameter {
    /// Fully qualified parameter name.
    pub name: String,
    /// Parameter value.
    pub value: String,
}

/// Adds the image-id parameters of `page` to `keys`.
pub fn collect_image_ids(page: ParametersPage, keys: &mut KeyMapping) {
    let suffix = format!("/{IMAGE_ID_LEAF}");
    for param in page.parameters {
        if param.name.ends_with(&suffix) {
            let _ = keys.insert(param.name.trim_start_matches('/').to_string(), param.value);
        }
    }
}

/// Parameter source backed by `aws ssm get-parameters-by-path`.
#[derive(Debug, Clone)]
pub struct AwsCliSource {
    program: PathBuf,
    query_path: String,
}

impl AwsCliSource {
    /// Locates `aws` on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns `ReconError::NotFound` if the program is not installed.
    pub fn locate(query_path: impl Into<String>) -> Result<Self> {
        Ok(Self::with_program(aws::locate()?, query_path))
    }

    /// Uses an explicit program path.
    #[must_use]
    pub fn with_program(program: impl Into<PathBuf>, query_path: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            query_path: query_path.into(),
        }
    }

    fn fetch_page(&self, region: &Region, next_token: Option<&str>) -> Result<ParametersPage> {
        let mut args = vec![
            "ssm",
            "get-parameters-by-path",
            "--path",
            self.query_path.as_str(),
            "--recursive",
            "--region",
            region.as_str(),
            "--output",
            "json",
        ];
        if let Some(token) = next_token {
            args.extend(["--next-token", token]);
        }
        let stdout = aws::run(&self.program, &args)?;
        Ok(serde_json::from_slice(&stdout)?)
    }
}

impl ParameterSource for AwsCliSource {
    fn fetch(&self, region: &Region) -> Result<KeyMapping> {
        tracing::info!(region = %region, path = %self.query_path, "fetching parameters");
        let mut keys = KeyMapping::new();
        let mut next_token: Option<String> = None;
        let mut pages = 0_usize;
        loop {
            let mut page = self.fetch_page(region, next_token.as_deref())?;
            pages += 1;
            next_token = page.next_token.take();
            collect_image_ids(page, &mut keys);
            if next_token.is_none() {
                break;
            }
        }
        tracing::debug!(
            region = %region,
            pages,
            parameters = keys.len(),
            "fetched all pages"
        );
        Ok(keys)
    }
}

/// Wraps a source with the snapshot cache.
///
/// With caching enabled, an existing snapshot is returned without asking
/// the inner source. Freshly fetched parameters are always written back.
#[derive(Debug)]
pub struct CachedSource<S> {
    inner: S,
    cache: SnapshotCache,
    use_cache: bool,
}

impl<S: ParameterSource> CachedSource<S> {
    /// Creates a cached source.
    #[must_use]
    pub const fn new(inner: S, cache: SnapshotCache, use_cache: bool) -> Self {
        Self {
            inner,
            cache,
            use_cache,
        }
    }
}

impl<S: ParameterSource> ParameterSource for CachedSource<S> {
    fn fetch(&self, region: &Region) -> Result<KeyMapping> {
        if self.use_cache {
            if let Some(keys) = self.cache.load(region)? {
                return Ok(keys);
            }
        }
        let keys = self.inner.fetch(region)?;
        self.cache.store(region, &keys)?;
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    struct CountingSource {
        calls: Cell<usize>,
    }

    impl ParameterSource for CountingSource {
        fn fetch(&self, _region: &Region) -> Result<KeyMapping> {
            self.calls.set(self.calls.get() + 1);
            Ok(KeyMapping::from([("fresh".to_string(), "ami-new".to_string())]))
        }
    }

    fn counting() -> CountingSource {
        CountingSource { calls: Cell::new(0) }
    }

    fn cached_keys() -> KeyMapping {
        KeyMapping::from([("cached".to_string(), "ami-old".to_string())])
    }

    #[test]
    fn collect_keeps_only_image_ids_without_leading_slash() {
        let page: ParametersPage = serde_json::from_str(
            r#"{"Parameters": [
                {"Name": "/aws/service/bottlerocket/aws-ecs-1/x86_64/1.14.3/image_id",
                 "Value": "ami-1", "Type": "String"},
                {"Name": "/aws/service/bottlerocket/aws-ecs-1/x86_64/1.14.3/image_version",
                 "Value": "1.14.3"}
            ]}"#,
        )
        .expect("parse");
        let mut keys = KeyMapping::new();
        collect_image_ids(page, &mut keys);
        assert_eq!(keys.len(), 1);
        let path = "aws/service/bottlerocket/aws-ecs-1/x86_64/1.14.3/image_id";
        assert_eq!(keys.get(path).map(String::as_str), Some("ami-1"));
    }

    #[test]
    fn page_without_parameters_parses() {
        let page: ParametersPage = serde_json::from_str(r#"{"NextToken": "t1"}"#).expect("parse");
        assert!(page.parameters.is_empty());
        assert_eq!(page.next_token.as_deref(), Some("t1"));
    }

    #[test]
    fn cached_source_prefers_snapshot() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = SnapshotCache::new(dir.path());
        let region = Region::new("us-west-2");
        cache.store(&region, &cached_keys()).expect("store");

        let source = CachedSource::new(counting(), cache, true);
        let keys = source.fetch(&region).expect("fetch");
        assert!(keys.contains_key("cached"));
        assert_eq!(source.inner.calls.get(), 0);
    }

    #[test]
    fn cached_source_fetches_and_stores_on_miss() {
        let dir = tempfile::tempdir().expect("tempdir");
        let region = Region::new("us-west-2");
        let source = CachedSource::new(counting(), SnapshotCache::new(dir.path()), true);

        let keys = source.fetch(&region).expect("fetch");
        assert!(keys.contains_key("fresh"));
        let _ = source.fetch(&region).expect("second fetch");
        assert_eq!(source.inner.calls.get(), 1);
    }

    #[test]
    fn cached_source_without_cache_refreshes_snapshot() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = SnapshotCache::new(dir.path());
        let region = Region::new("us-west-2");
        cache.store(&region, &cached_keys()).expect("store");

        let source = CachedSource::new(counting(), cache.clone(), false);
        let keys = source.fetch(&region).expect("fetch");
        assert!(keys.contains_key("fresh"));
        assert_eq!(source.inner.calls.get(), 1);
        let stored = cache.load(&region).expect("load").expect("snapshot");
        assert!(stored.contains_key("fresh"));
    }

    #[cfg(unix)]
    mod cli {
        use amirecon_common::error::ReconError;
        use amirecon_common::types::Region;
        use amirecon_core::reconcile::ParameterSource;

        use crate::aws::stub;
        use crate::ssm::AwsCliSource;

        const STUB: &str = r#"#!/bin/sh
dir=$(dirname "$0")
tokens=0
token=""
prev=""
for arg in "$@"; do
  if [ "$prev" = "--next-token" ]; then
    tokens=$((tokens + 1))
    token="$arg"
  fi
  prev="$arg"
done
if [ "$tokens" -gt 1 ]; then
  echo "repeated --next-token" >&2
  exit 2
fi
if [ -z "$token" ]; then
  cat "$dir/page-first.json"
else
  cat "$dir/page-$token.json"
fi
"#;

        fn page(name: &str, version: &str, next: Option<&str>) -> String {
            let next = next.map_or_else(String::new, |t| format!(r#", "NextToken": "{t}""#));
            let param = format!("/aws/service/bottlerocket/{name}/x86_64/{version}/image_id");
            format!(r#"{{"Parameters": [{{"Name": "{param}", "Value": "ami-{version}"}}]{next}}}"#)
        }

        #[test]
        fn aws_cli_source_follows_pagination() {
            let dir = tempfile::tempdir().expect("tempdir");
            let pages = [
                ("page-first.json", page("aws-ecs-1", "1.14.3", Some("t1"))),
                ("page-t1.json", page("aws-ecs-1", "1.15.0", Some("t2"))),
                ("page-t2.json", page("aws-ecs-2", "1.16.0", None)),
            ];
            for (file, body) in pages {
                std::fs::write(dir.path().join(file), body).expect("write");
            }
            let program = stub::install(dir.path(), STUB);

            let source = AwsCliSource::with_program(program, "/aws/service/bottlerocket");
            let keys = source.fetch(&Region::new("us-west-2")).expect("fetch");
            assert_eq!(keys.len(), 3);
            let last = "aws/service/bottlerocket/aws-ecs-2/x86_64/1.16.0/image_id";
            assert_eq!(keys.get(last).map(String::as_str), Some("ami-1.16.0"));
        }

        #[test]
        fn aws_cli_source_reports_failures() {
            let dir = tempfile::tempdir().expect("tempdir");
            let script = "#!/bin/sh\necho 'Unable to locate credentials' >&2\nexit 255\n";
            let program = stub::install(dir.path(), script);

            let source = AwsCliSource::with_program(program, "/aws/service/bottlerocket");
            let err = source.fetch(&Region::new("us-west-2")).unwrap_err();
            assert!(matches!(err, ReconError::Command { .. }));
            assert!(err.to_string().contains("Unable to locate credentials"), "got: {err}");
        }

        #[test]
        fn aws_cli_source_missing_program_is_io_error() {
            let source =
                AwsCliSource::with_program("/nonexistent/aws", "/aws/service/bottlerocket");
            let err = source.fetch(&Region::new("us-west-2")).unwrap_err();
            assert!(matches!(err, ReconError::Io { .. }));
        }
    }
}
