//! [`CapacityProvider`] backed by the EC2 and SageMaker APIs.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_ec2::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_ec2::primitives::DateTime as SdkDateTime;
use aws_sdk_sagemaker::types::{ReservedCapacityInstanceType, SageMakerResourceName};
use chrono::{DateTime, FixedOffset};
use tokio::runtime::Runtime;

use super::CapacityProvider;
use crate::domain::{
    CapacityBlockOffering, CapacityBlockQuery, ProviderTimestamp, ReservedCapacityOffering,
    TrainingPlanOffering, TrainingPlanQuery,
};
use crate::error::ProviderError;

// Only used until a per-call region override is applied.
const DEFAULT_REGION: &str = "us-east-1";

/// Blocking provider holding the shared SDK configuration and the runtime its async calls are driven on.
pub struct AwsProvider {
    config: SdkConfig,
    runtime: Runtime,
}

impl AwsProvider {
    /// Loads the shared SDK configuration (environment, profile files, instance metadata), optionally
    /// pinned to a named profile.
    pub fn new(profile: Option<String>) -> Result<Self, ProviderError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| ProviderError::validation(format!("failed to start async runtime: {e}")))?;

        let config = runtime.block_on(async {
            let loader = aws_config::defaults(BehaviorVersion::latest())
                .region(Region::from_static(DEFAULT_REGION));
            let loader = match profile {
                Some(profile) => {
                    tracing::debug!(profile, "loading AWS config from profile");
                    loader.profile_name(profile)
                }
                None => loader,
            };
            loader.load().await
        });

        if config.credentials_provider().is_none() {
            return Err(ProviderError::validation("no AWS credentials provider configured"));
        }

        Ok(Self { config, runtime })
    }

    fn ec2(&self, region: &str) -> aws_sdk_ec2::Client {
        let conf = aws_sdk_ec2::config::Builder::from(&self.config)
            .region(Region::new(region.to_string()))
            .build();
        aws_sdk_ec2::Client::from_conf(conf)
    }

    fn sagemaker(&self, region: &str) -> aws_sdk_sagemaker::Client {
        let conf = aws_sdk_sagemaker::config::Builder::from(&self.config)
            .region(Region::new(region.to_string()))
            .build();
        aws_sdk_sagemaker::Client::from_conf(conf)
    }
}

impl CapacityProvider for AwsProvider {
    fn describe_capacity_block_offerings(
        &self,
        region: &str,
        query: &CapacityBlockQuery,
    ) -> Result<Vec<CapacityBlockOffering>, ProviderError> {
        let mut request = self
            .ec2(region)
            .describe_capacity_block_offerings()
            .instance_type(query.instance_type.clone())
            .instance_count(to_i32(query.instance_count, "instance count")?)
            .capacity_duration_hours(to_i32(query.capacity_duration_hours, "duration")?)
            .start_date_range(to_sdk_datetime(query.start_date_range))
            .max_results(query.max_results);
        if let Some(end) = query.end_date_range {
            request = request.end_date_range(to_sdk_datetime(end));
        }

        let output = self
            .runtime
            .block_on(request.send())
            .map_err(provider_error)?;

        let offerings = output
            .capacity_block_offerings()
            .iter()
            .map(|o| CapacityBlockOffering {
                instance_type: o.instance_type().map(str::to_string),
                instance_count: o.instance_count().and_then(|c| u32::try_from(c).ok()),
                capacity_block_duration_hours: o
                    .capacity_block_duration_hours()
                    .and_then(|h| u32::try_from(h).ok()),
                upfront_fee: o.upfront_fee().map(str::to_string),
                start_date: o.start_date().and_then(to_timestamp),
                end_date: o.end_date().and_then(to_timestamp),
                availability_zone: o.availability_zone().map(str::to_string),
                // EC2 does not split capacity blocks into parts
                reserved_capacity_offerings: None,
            })
            .collect();
        Ok(offerings)
    }

    fn search_training_plan_offerings(
        &self,
        region: &str,
        query: &TrainingPlanQuery,
    ) -> Result<Vec<TrainingPlanOffering>, ProviderError> {
        let mut request = self
            .sagemaker(region)
            .search_training_plan_offerings()
            .target_resources(SageMakerResourceName::from(query.target_resource.as_str()))
            .instance_type(ReservedCapacityInstanceType::from(
                query.instance_type.as_str(),
            ))
            .instance_count(to_i32(query.instance_count, "instance count")?)
            .duration_hours(i64::from(query.duration_hours))
            .start_time_after(to_sdk_datetime(query.start_time_after));
        if let Some(end) = query.end_time_before {
            request = request.end_time_before(to_sdk_datetime(end));
        }

        let output = self
            .runtime
            .block_on(request.send())
            .map_err(provider_error)?;

        let offerings = output
            .training_plan_offerings()
            .iter()
            .map(|o| TrainingPlanOffering {
                duration_hours: o.duration_hours().and_then(|h| u32::try_from(h).ok()),
                upfront_fee: o.upfront_fee().map(str::to_string),
                reserved_capacity_offerings: o
                    .reserved_capacity_offerings()
                    .iter()
                    .map(|r| ReservedCapacityOffering {
                        instance_type: r.instance_type().map(|t| t.as_str().to_string()),
                        instance_count: r.instance_count().and_then(|c| u32::try_from(c).ok()),
                        availability_zone: r.availability_zone().map(str::to_string),
                        duration_hours: r.duration_hours().and_then(|h| u32::try_from(h).ok()),
                        start_time: r.start_time().and_then(to_timestamp),
                        end_time: r.end_time().and_then(to_timestamp),
                    })
                    .collect(),
            })
            .collect();
        Ok(offerings)
    }
}

fn provider_error<E, R>(err: SdkError<E, R>) -> ProviderError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match &err {
        SdkError::ServiceError(service) => {
            let code = service.err().code().unwrap_or("Unknown").to_string();
            let message = match service.err().message() {
                Some(message) => format!("{code}: {message}"),
                None => DisplayErrorContext(&err).to_string(),
            };
            ProviderError::service(code, message)
        }
        SdkError::ConstructionFailure(_) => {
            ProviderError::validation(DisplayErrorContext(&err).to_string())
        }
        _ => ProviderError::transport(DisplayErrorContext(&err).to_string()),
    }
}

fn to_i32(value: u32, field: &str) -> Result<i32, ProviderError> {
    i32::try_from(value).map_err(|_| ProviderError::validation(format!("{field} out of range")))
}

fn to_sdk_datetime(value: DateTime<FixedOffset>) -> SdkDateTime {
    SdkDateTime::from_secs(value.timestamp())
}

fn to_timestamp(value: &SdkDateTime) -> Option<ProviderTimestamp> {
    DateTime::from_timestamp(value.secs(), value.subsec_nanos())
        .map(|dt| ProviderTimestamp::Structured(dt.fixed_offset()))
}
