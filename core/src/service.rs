//! Per-backend service types.
//!
//! A service wraps one `Client` with a fixed response type and knows how to
//! build its own live client. Tests override `mock` to swap in a client over
//! `MockTransport`; by default `mock` is the live service.

use crate::client::Client;
use crate::error::NetworkError;

pub trait Service: Sized {
    /// Model every call of this service decodes into.
    type Response: 'static;

    fn from_client(client: Client<Self::Response>) -> Self;

    fn client(&self) -> &Client<Self::Response>;

    /// The service wired to its real backend.
    fn live() -> Result<Self, NetworkError>;

    fn mock() -> Result<Self, NetworkError> {
        Self::live()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde::{Deserialize, Serialize};
    use url::Url;

    use super::*;
    use crate::http::Headers;
    use crate::request::Call;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Health {
        healthy: bool,
    }

    struct HealthService {
        client: Client<Health>,
    }

    impl HealthService {
        fn check(&self) -> Result<Health, NetworkError> {
            self.client().response(Call::get("health"))
        }
    }

    impl Service for HealthService {
        type Response = Health;

        fn from_client(client: Client<Health>) -> Self {
            Self { client }
        }

        fn client(&self) -> &Client<Health> {
            &self.client
        }

        fn live() -> Result<Self, NetworkError> {
            let base = Url::parse("https://status.example.org")
                .map_err(|e| NetworkError::UrlNotComposable(e.to_string()))?;
            Ok(Self::from_client(Client::live(base, Headers::new())))
        }

        fn mock() -> Result<Self, NetworkError> {
            let client = Client::mock(Ok(Health { healthy: true }), 200, Duration::ZERO)?;
            Ok(Self::from_client(client))
        }
    }

    /// Relies on the default `mock`.
    struct LiveOnly {
        client: Client<Health>,
    }

    impl Service for LiveOnly {
        type Response = Health;

        fn from_client(client: Client<Health>) -> Self {
            Self { client }
        }

        fn client(&self) -> &Client<Health> {
            &self.client
        }

        fn live() -> Result<Self, NetworkError> {
            let base = Url::parse("https://live.example.org")
                .map_err(|e| NetworkError::UrlNotComposable(e.to_string()))?;
            Ok(Self::from_client(Client::live(base, Headers::new())))
        }
    }

    #[test]
    fn mock_service_answers_without_network() {
        let service = HealthService::mock().unwrap();
        assert_eq!(service.client().base_url().as_str(), "https://example.com/");
        assert_eq!(service.check().unwrap(), Health { healthy: true });
    }

    #[test]
    fn live_service_is_bound_to_its_backend() {
        let service = HealthService::live().unwrap();
        assert_eq!(service.client().base_url().as_str(), "https://status.example.org/");
    }

    #[test]
    fn mock_defaults_to_live() {
        let service = LiveOnly::mock().unwrap();
        assert_eq!(service.client().base_url().as_str(), "https://live.example.org/");
    }
}
