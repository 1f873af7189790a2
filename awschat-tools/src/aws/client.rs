//! Narrow async interfaces over the AWS services the tools call
//!
//! Each trait exposes only the operations an inspection needs, with results
//! reduced to plain Rust types. The `Sdk*` implementations build a new
//! service client from a shared [`SdkConfig`] on every call.

use async_trait::async_trait;
use aws_config::SdkConfig;

use super::error::AwsApiError;

/// One bucket ACL entry, reduced to the grantee URI
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grant {
    pub grantee_uri: Option<String>,
}

impl Grant {
    pub fn uri(uri: impl Into<String>) -> Self {
        Self {
            grantee_uri: Some(uri.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reservation {
    pub instances: Vec<Instance>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Instance {
    pub instance_id: Option<String>,
    pub instance_type: Option<String>,
}

/// Which address an EC2 lookup matches against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpFilter {
    PublicIp,
    PrivateIp,
}

impl IpFilter {
    /// DescribeInstances filter name
    pub fn filter_name(&self) -> &'static str {
        match self {
            IpFilter::PublicIp => "ip-address",
            IpFilter::PrivateIp => "private-ip-address",
        }
    }
}

#[async_trait]
pub trait S3Api: Send + Sync {
    async fn list_buckets(&self) -> Result<Vec<String>, AwsApiError>;

    async fn get_bucket_acl(&self, bucket: &str) -> Result<Vec<Grant>, AwsApiError>;

    /// First page of object keys, at most `max_keys`
    async fn list_objects(&self, bucket: &str, max_keys: i32) -> Result<Vec<String>, AwsApiError>;
}

#[async_trait]
pub trait Ec2Api: Send + Sync {
    async fn describe_instances(
        &self,
        filter: IpFilter,
        ip: &str,
    ) -> Result<Vec<Reservation>, AwsApiError>;
}

#[async_trait]
pub trait IamApi: Send + Sync {
    async fn list_attached_user_policies(&self, user: &str) -> Result<Vec<String>, AwsApiError>;

    async fn list_user_policies(&self, user: &str) -> Result<Vec<String>, AwsApiError>;
}

#[derive(Debug, Clone)]
pub struct SdkS3 {
    config: SdkConfig,
}

impl SdkS3 {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    fn client(&self) -> aws_sdk_s3::Client {
        aws_sdk_s3::Client::new(&self.config)
    }
}

#[async_trait]
impl S3Api for SdkS3 {
    async fn list_buckets(&self) -> Result<Vec<String>, AwsApiError> {
        let output = self
            .client()
            .list_buckets()
            .send()
            .await
            .map_err(AwsApiError::from_sdk)?;

        Ok(output
            .buckets()
            .iter()
            .filter_map(|b| b.name().map(str::to_string))
            .collect())
    }

    async fn get_bucket_acl(&self, bucket: &str) -> Result<Vec<Grant>, AwsApiError> {
        let output = self
            .client()
            .get_bucket_acl()
            .bucket(bucket)
            .send()
            .await
            .map_err(AwsApiError::from_sdk)?;

        Ok(output
            .grants()
            .iter()
            .map(|g| Grant {
                grantee_uri: g.grantee().and_then(|grantee| grantee.uri()).map(str::to_string),
            })
            .collect())
    }

    async fn list_objects(&self, bucket: &str, max_keys: i32) -> Result<Vec<String>, AwsApiError> {
        let output = self
            .client()
            .list_objects_v2()
            .bucket(bucket)
            .max_keys(max_keys)
            .send()
            .await
            .map_err(AwsApiError::from_sdk)?;

        Ok(output
            .contents()
            .iter()
            .filter_map(|o| o.key().map(str::to_string))
            .collect())
    }
}

#[derive(Debug, Clone)]
pub struct SdkEc2 {
    config: SdkConfig,
}

impl SdkEc2 {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

#[async_trait]
impl Ec2Api for SdkEc2 {
    async fn describe_instances(
        &self,
        filter: IpFilter,
        ip: &str,
    ) -> Result<Vec<Reservation>, AwsApiError> {
        let output = aws_sdk_ec2::Client::new(&self.config)
            .describe_instances()
            .filters(
                aws_sdk_ec2::types::Filter::builder()
                    .name(filter.filter_name())
                    .values(ip)
                    .build(),
            )
            .send()
            .await
            .map_err(AwsApiError::from_sdk)?;

        Ok(output
            .reservations()
            .iter()
            .map(|r| Reservation {
                instances: r
                    .instances()
                    .iter()
                    .map(|i| Instance {
                        instance_id: i.instance_id().map(str::to_string),
                        instance_type: i.instance_type().map(|t| t.as_str().to_string()),
                    })
                    .collect(),
            })
            .collect())
    }
}

#[derive(Debug, Clone)]
pub struct SdkIam {
    config: SdkConfig,
}

impl SdkIam {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    fn client(&self) -> aws_sdk_iam::Client {
        aws_sdk_iam::Client::new(&self.config)
    }
}

#[async_trait]
impl IamApi for SdkIam {
    async fn list_attached_user_policies(&self, user: &str) -> Result<Vec<String>, AwsApiError> {
        let output = self
            .client()
            .list_attached_user_policies()
            .user_name(user)
            .send()
            .await
            .map_err(AwsApiError::from_sdk)?;

        Ok(output
            .attached_policies()
            .iter()
            .filter_map(|p| p.policy_name().map(str::to_string))
            .collect())
    }

    async fn list_user_policies(&self, user: &str) -> Result<Vec<String>, AwsApiError> {
        let output = self
            .client()
            .list_user_policies()
            .user_name(user)
            .send()
            .await
            .map_err(AwsApiError::from_sdk)?;

        Ok(output.policy_names().to_vec())
    }
}
