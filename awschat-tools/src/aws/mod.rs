//! Read-only AWS inspection tools
//!
//! Four tools answer questions about the account the AWS credentials belong
//! to. Each one calls its service through an injected client ([`S3Api`],
//! [`Ec2Api`], [`IamApi`]) and always answers with text: either the result
//! or a `Failed to ...` line. Nothing is raised to the agent.
//!
//! ```no_run
//! use awschat_core::Agent;
//!
//! # async fn example() -> awschat_core::Result<()> {
//! let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
//!
//! let agent = Agent::builder()
//!     .bedrock(awschat_core::ClaudeHaiku4_5)
//!     .add_tools(awschat_tools::aws::all_tools(&sdk_config))
//!     .build()
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod ec2;
mod error;
mod iam;
mod s3;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use std::fmt::Display;
use std::sync::Arc;

use aws_config::SdkConfig;
use awschat_core::{box_tools, DynTool, ToolResult};

pub use client::{
    Ec2Api, Grant, IamApi, Instance, IpFilter, Reservation, S3Api, SdkEc2, SdkIam, SdkS3,
};
pub use ec2::{Ec2InstanceTypeByIp, Ec2InstanceTypeByIpInput, InstanceLookup};
pub use error::{AwsApiError, InspectionError};
pub use iam::{DescribeUserPermissions, DescribeUserPermissionsInput, UserPolicies};
pub use s3::{
    BucketContents, CountPublicS3Buckets, CountPublicS3BucketsInput, DescribeBucketContents,
    DescribeBucketContentsInput, PublicBucketCount, MAX_KEYS,
};

/// Both sides of an inspection become the text the model sees.
fn render<T: Display>(outcome: Result<T, InspectionError>) -> ToolResult {
    match outcome {
        Ok(value) => ToolResult::Text(value.to_string()),
        Err(err) => ToolResult::Text(err.to_string()),
    }
}

/// All four tools, backed by the AWS SDK.
pub fn all_tools(config: &SdkConfig) -> Vec<Box<dyn DynTool>> {
    all_tools_with(
        Arc::new(SdkS3::new(config)),
        Arc::new(SdkEc2::new(config)),
        Arc::new(SdkIam::new(config)),
    )
}

/// All four tools over the given clients, in registration order.
pub fn all_tools_with(
    s3: Arc<dyn S3Api>,
    ec2: Arc<dyn Ec2Api>,
    iam: Arc<dyn IamApi>,
) -> Vec<Box<dyn DynTool>> {
    box_tools![
        CountPublicS3Buckets::new(s3.clone()),
        DescribeBucketContents::new(s3),
        Ec2InstanceTypeByIp::new(ec2),
        DescribeUserPermissions::new(iam),
    ]
}
