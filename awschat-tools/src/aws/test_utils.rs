//! In-memory fakes for [`S3Api`], [`Ec2Api`] and [`IamApi`]
//!
//! Each fake answers from configured data and records the calls it receives.
//! Anything not configured behaves like an empty account.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::client::{Ec2Api, Grant, IamApi, IpFilter, Reservation, S3Api};
use super::error::AwsApiError;

fn owned(items: impl IntoIterator<Item = impl Into<String>>) -> Vec<String> {
    items.into_iter().map(Into::into).collect()
}

#[derive(Default)]
pub struct FakeS3 {
    buckets: Option<Result<Vec<String>, AwsApiError>>,
    acls: HashMap<String, Result<Vec<Grant>, AwsApiError>>,
    objects: HashMap<String, Result<Vec<String>, AwsApiError>>,
    calls: Mutex<Vec<String>>,
}

impl FakeS3 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_buckets(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.buckets = Some(Ok(owned(names)));
        self
    }

    pub fn with_list_buckets_error(mut self, err: AwsApiError) -> Self {
        self.buckets = Some(Err(err));
        self
    }

    pub fn with_acl(mut self, bucket: &str, grants: Vec<Grant>) -> Self {
        self.acls.insert(bucket.to_string(), Ok(grants));
        self
    }

    pub fn with_acl_error(mut self, bucket: &str, err: AwsApiError) -> Self {
        self.acls.insert(bucket.to_string(), Err(err));
        self
    }

    /// Keys returned for `bucket`, truncated to the requested `max_keys`
    pub fn with_objects(
        mut self,
        bucket: &str,
        keys: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.objects.insert(bucket.to_string(), Ok(owned(keys)));
        self
    }

    pub fn with_objects_error(mut self, bucket: &str, err: AwsApiError) -> Self {
        self.objects.insert(bucket.to_string(), Err(err));
        self
    }

    /// Calls received so far, e.g. `get_bucket_acl:logs`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl S3Api for FakeS3 {
    async fn list_buckets(&self) -> Result<Vec<String>, AwsApiError> {
        self.calls.lock().push("list_buckets".to_string());
        self.buckets.clone().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn get_bucket_acl(&self, bucket: &str) -> Result<Vec<Grant>, AwsApiError> {
        self.calls.lock().push(format!("get_bucket_acl:{}", bucket));
        self.acls.get(bucket).cloned().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn list_objects(&self, bucket: &str, max_keys: i32) -> Result<Vec<String>, AwsApiError> {
        self.calls
            .lock()
            .push(format!("list_objects:{}:{}", bucket, max_keys));
        let limit = usize::try_from(max_keys).unwrap_or_default();
        match self.objects.get(bucket) {
            Some(Ok(keys)) => Ok(keys.iter().take(limit).cloned().collect()),
            Some(Err(e)) => Err(e.clone()),
            None => Err(AwsApiError::new(
                "NoSuchBucket",
                "The specified bucket does not exist",
            )),
        }
    }
}

#[derive(Default)]
pub struct FakeEc2 {
    reservations: HashMap<(IpFilter, String), Vec<Reservation>>,
    errors: HashMap<IpFilter, AwsApiError>,
    calls: Mutex<Vec<(IpFilter, String)>>,
}

impl FakeEc2 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reservations(
        mut self,
        filter: IpFilter,
        ip: &str,
        reservations: Vec<Reservation>,
    ) -> Self {
        self.reservations.insert((filter, ip.to_string()), reservations);
        self
    }

    /// Fail every lookup made with `filter`
    pub fn with_error(mut self, filter: IpFilter, err: AwsApiError) -> Self {
        self.errors.insert(filter, err);
        self
    }

    pub fn calls(&self) -> Vec<(IpFilter, String)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl Ec2Api for FakeEc2 {
    async fn describe_instances(
        &self,
        filter: IpFilter,
        ip: &str,
    ) -> Result<Vec<Reservation>, AwsApiError> {
        self.calls.lock().push((filter, ip.to_string()));
        if let Some(err) = self.errors.get(&filter) {
            return Err(err.clone());
        }
        Ok(self
            .reservations
            .get(&(filter, ip.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}

#[derive(Default)]
pub struct FakeIam {
    attached: HashMap<String, Result<Vec<String>, AwsApiError>>,
    inline: HashMap<String, Result<Vec<String>, AwsApiError>>,
    calls: Mutex<Vec<String>>,
}

impl FakeIam {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attached(
        mut self,
        user: &str,
        policies: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.attached.insert(user.to_string(), Ok(owned(policies)));
        self
    }

    pub fn with_attached_error(mut self, user: &str, err: AwsApiError) -> Self {
        self.attached.insert(user.to_string(), Err(err));
        self
    }

    pub fn with_inline(
        mut self,
        user: &str,
        policies: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.inline.insert(user.to_string(), Ok(owned(policies)));
        self
    }

    pub fn with_inline_error(mut self, user: &str, err: AwsApiError) -> Self {
        self.inline.insert(user.to_string(), Err(err));
        self
    }

    /// Calls received so far, e.g. `list_user_policies:alice`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl IamApi for FakeIam {
    async fn list_attached_user_policies(&self, user: &str) -> Result<Vec<String>, AwsApiError> {
        self.calls
            .lock()
            .push(format!("list_attached_user_policies:{}", user));
        self.attached
            .get(user)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn list_user_policies(&self, user: &str) -> Result<Vec<String>, AwsApiError> {
        self.calls.lock().push(format!("list_user_policies:{}", user));
        self.inline
            .get(user)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}
