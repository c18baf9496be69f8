//! Module defining the boundary to the cloud provider's reservation APIs

#[cfg(feature = "aws")]
mod aws;

#[cfg(feature = "aws")]
pub use aws::AwsProvider;

use crate::domain::{
    CapacityBlockOffering, CapacityBlockQuery, TrainingPlanOffering, TrainingPlanQuery,
};
use crate::error::ProviderError;

/// Read-only access to the reservation offerings of a cloud provider.
///
/// Both operations are blocking remote calls scoped to a single region. Implementations are shared between
/// the scan workers and must not rely on being called from one thread only.
pub trait CapacityProvider: Sync {
    fn describe_capacity_block_offerings(
        &self,
        region: &str,
        query: &CapacityBlockQuery,
    ) -> Result<Vec<CapacityBlockOffering>, ProviderError>;

    fn search_training_plan_offerings(
        &self,
        region: &str,
        query: &TrainingPlanQuery,
    ) -> Result<Vec<TrainingPlanOffering>, ProviderError>;
}

impl<P: CapacityProvider + ?Sized> CapacityProvider for &P {
    fn describe_capacity_block_offerings(
        &self,
        region: &str,
        query: &CapacityBlockQuery,
    ) -> Result<Vec<CapacityBlockOffering>, ProviderError> {
        (**self).describe_capacity_block_offerings(region, query)
    }

    fn search_training_plan_offerings(
        &self,
        region: &str,
        query: &TrainingPlanQuery,
    ) -> Result<Vec<TrainingPlanOffering>, ProviderError> {
        (**self).search_training_plan_offerings(region, query)
    }
}
