//! AWS client construction.
//!
//! Region priority: flag > environment > us-west-2. Credentials resolve through
//! a named profile when one is given, otherwise the default chain (environment
//! variables, ~/.aws/credentials, instance profile). A custom endpoint URL
//! points the DynamoDB client at DynamoDB Local; the autoscaling client always
//! talks to the real control plane.

use aws_config::BehaviorVersion;
use aws_config::meta::region::RegionProviderChain;
use aws_config::profile::ProfileFileCredentialsProvider;
use aws_sdk_dynamodb::config::Region;

/// Fallback region when neither the flag nor the environment specify one.
pub const DEFAULT_REGION: &str = "us-west-2";

/// Connection settings shared by both service clients.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// AWS region.
    pub region: Option<String>,
    /// Named profile from ~/.aws/credentials.
    pub profile: Option<String>,
    /// Custom DynamoDB endpoint URL for local testing.
    pub endpoint_url: Option<String>,
}

/// The two control-plane clients the provisioner drives.
#[derive(Clone)]
pub struct Clients {
    pub dynamodb: aws_sdk_dynamodb::Client,
    pub autoscaling: aws_sdk_applicationautoscaling::Client,
}

/// Build both service clients from one shared AWS config.
pub async fn build_clients(config: &ClientConfig) -> Clients {
    let region_provider =
        RegionProviderChain::first_try(config.region.clone().map(Region::new))
            .or_default_provider()
            .or_else(DEFAULT_REGION);

    let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region_provider);

    if let Some(profile_name) = &config.profile {
        let profile_provider = ProfileFileCredentialsProvider::builder()
            .profile_name(profile_name)
            .build();
        loader = loader.credentials_provider(profile_provider);
    }
    // else: default credential chain (env vars, shared config, instance profile)

    let sdk_config = loader.load().await;

    let mut dynamodb_config = aws_sdk_dynamodb::config::Builder::from(&sdk_config);
    if let Some(url) = &config.endpoint_url {
        dynamodb_config = dynamodb_config.endpoint_url(url);
    }

    Clients {
        dynamodb: aws_sdk_dynamodb::Client::from_conf(dynamodb_config.build()),
        autoscaling: aws_sdk_applicationautoscaling::Client::new(&sdk_config),
    }
}
