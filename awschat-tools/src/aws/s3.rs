use std::fmt;
use std::sync::Arc;

use crate::prelude::*;

use super::client::{Grant, S3Api};
use super::error::InspectionError;
use super::render;

/// Grantee URIs that make a bucket readable by anyone
const PUBLIC_GRANTEES: [&str; 2] = ["AllUsers", "AuthenticatedUsers"];

/// Keys returned by [`DescribeBucketContents`]
pub const MAX_KEYS: i32 = 5;

fn is_public_grant(grant: &Grant) -> bool {
    grant
        .grantee_uri
        .as_deref()
        .is_some_and(|uri| PUBLIC_GRANTEES.iter().any(|g| uri.contains(g)))
}

/// Number of buckets with at least one public ACL grant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicBucketCount(pub usize);

impl fmt::Display for PublicBucketCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct CountPublicS3BucketsInput {}

/// Counts buckets whose ACL grants access to `AllUsers` or
/// `AuthenticatedUsers`.
///
/// Buckets whose ACL cannot be read are skipped, so the count can be low.
pub struct CountPublicS3Buckets {
    s3: Arc<dyn S3Api>,
}

impl CountPublicS3Buckets {
    pub fn new(s3: Arc<dyn S3Api>) -> Self {
        Self { s3 }
    }

    pub async fn inspect(&self) -> Result<PublicBucketCount, InspectionError> {
        let buckets = self.s3.list_buckets().await.map_err(|e| {
            log::debug!("ListBuckets failed: {}", e);
            InspectionError::ListBuckets(e)
        })?;

        let mut public = 0;
        for bucket in &buckets {
            match self.s3.get_bucket_acl(bucket).await {
                Ok(grants) if grants.iter().any(is_public_grant) => public += 1,
                Ok(_) => {}
                Err(e) => log::debug!("skipping bucket {}: GetBucketAcl failed: {}", bucket, e),
            }
        }

        Ok(PublicBucketCount(public))
    }
}

impl Tool for CountPublicS3Buckets {
    type Input = CountPublicS3BucketsInput;

    fn name(&self) -> &str {
        "count_public_s3_buckets"
    }

    fn description(&self) -> &str {
        "Return the number of S3 buckets that are publicly accessible."
    }

    async fn execute(&self, _input: Self::Input) -> Result<ToolResult, ToolError> {
        Ok(render(self.inspect().await))
    }
}

/// First page of keys in a bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketContents {
    pub bucket: String,
    pub keys: Vec<String>,
}

impl fmt::Display for BucketContents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.keys.is_empty() {
            write!(f, "Bucket {} is empty.", self.bucket)
        } else {
            f.write_str(&self.keys.join("\n"))
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DescribeBucketContentsInput {
    /// Name of the S3 bucket
    pub bucket: String,
}

/// Lists up to five object keys of a bucket.
pub struct DescribeBucketContents {
    s3: Arc<dyn S3Api>,
}

impl DescribeBucketContents {
    pub fn new(s3: Arc<dyn S3Api>) -> Self {
        Self { s3 }
    }

    pub async fn inspect(&self, bucket: &str) -> Result<BucketContents, InspectionError> {
        match self.s3.list_objects(bucket, MAX_KEYS).await {
            Ok(keys) => Ok(BucketContents {
                bucket: bucket.to_string(),
                keys,
            }),
            Err(source) => {
                log::debug!("ListObjectsV2 on {} failed: {}", bucket, source);
                Err(InspectionError::ListObjects {
                    bucket: bucket.to_string(),
                    source,
                })
            }
        }
    }
}

impl Tool for DescribeBucketContents {
    type Input = DescribeBucketContentsInput;

    fn name(&self) -> &str {
        "describe_bucket_contents"
    }

    fn description(&self) -> &str {
        "Return a short description of the objects stored in the S3 bucket."
    }

    async fn execute(&self, input: Self::Input) -> Result<ToolResult, ToolError> {
        Ok(render(self.inspect(&input.bucket).await))
    }
}
