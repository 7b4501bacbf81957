//! AMI manifests read straight from the build bucket through the `aws`
//! command line.
//!
//! Keys below the prefix are listed with `s3api list-objects-v2`, one
//! continuation page at a time, and every `*-amis.json` object is streamed
//! with `s3 cp <uri> -`.

use std::path::PathBuf;

use amirecon_common::error::Result;
use serde::Deserialize;

use crate::aws;
use crate::manifest::{ManifestStore, is_manifest_name};

/// One page of `list-objects-v2` output.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ObjectsPage {
    #[serde(default)]
    contents: Vec<S3Object>,
    next_continuation_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct S3Object {
    key: String,
}

/// Manifest store backed by an S3 bucket.
#[derive(Debug, Clone)]
pub struct S3Manifests {
    program: PathBuf,
    bucket: String,
    prefix: String,
}

impl S3Manifests {
    /// Locates `aws` on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns `ReconError::NotFound` if the program is not installed.
    pub fn locate(bucket: impl Into<String>, prefix: impl Into<String>) -> Result<Self> {
        Ok(Self::with_program(aws::locate()?, bucket, prefix))
    }

    /// Uses an explicit program path.
    #[must_use]
    pub fn with_program(
        program: impl Into<PathBuf>,
        bucket: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            program: program.into(),
            bucket: bucket.into(),
            prefix: prefix.into(),
        }
    }

    fn list_page(&self, token: Option<&str>) -> Result<ObjectsPage> {
        let mut args = vec![
            "s3api",
            "list-objects-v2",
            "--bucket",
            self.bucket.as_str(),
            "--prefix",
            self.prefix.as_str(),
            "--no-paginate",
            "--output",
            "json",
        ];
        if let Some(token) = token {
            args.extend(["--continuation-token", token]);
        }
        let stdout = aws::run(&self.program, &args)?;
        if stdout.iter().all(u8::is_ascii_whitespace) {
            return Ok(ObjectsPage::default());
        }
        Ok(serde_json::from_slice(&stdout)?)
    }
}

impl ManifestStore for S3Manifests {
    fn list(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut token: Option<String> = None;
        loop {
            let mut page = self.list_page(token.as_deref())?;
            token = page.next_continuation_token.take();
            keys.extend(
                page.contents
                    .into_iter()
                    .map(|object| object.key)
                    .filter(|key| is_manifest_name(key)),
            );
            if token.is_none() {
                break;
            }
        }
        keys.sort();
        tracing::info!(
            bucket = %self.bucket,
            prefix = %self.prefix,
            manifests = keys.len(),
            "listed AMI manifests"
        );
        Ok(keys)
    }

    fn read(&self, id: &str) -> Result<String> {
        let uri = format!("s3://{}/{id}", self.bucket);
        tracing::debug!(uri = %uri, "reading AMI manifest");
        let stdout = aws::run(&self.program, &["s3", "cp", uri.as_str(), "-"])?;
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}
