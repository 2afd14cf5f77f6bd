use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::RwLock;

/// Aggregate counters over every listing request this client has made.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiMetrics {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub average_response_time: Duration,
    pub last_request_time: Option<SystemTime>,
    pub last_endpoint: Option<String>,
    pub last_status_code: Option<u16>,
}

#[derive(Debug, Clone)]
pub struct RequestMetrics {
    pub endpoint: String,
    pub status_code: Option<u16>,
    pub response_time: Duration,
    pub success: bool,
}

#[derive(Debug, Default)]
pub struct MetricsCollector {
    metrics: Arc<RwLock<ApiMetrics>>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record_request(&self, request_metrics: RequestMetrics) {
        let mut metrics = self.metrics.write().await;

        metrics.total_requests += 1;
        metrics.last_request_time = Some(SystemTime::now());
        metrics.last_endpoint = Some(request_metrics.endpoint);
        metrics.last_status_code = request_metrics.status_code;

        if request_metrics.success {
            metrics.successful_requests += 1;
        } else {
            metrics.failed_requests += 1;
        }

        // Running average over all requests so far
        let previous_total =
            metrics.average_response_time * (metrics.total_requests - 1) as u32;
        metrics.average_response_time =
            (previous_total + request_metrics.response_time) / metrics.total_requests as u32;
    }

    pub async fn get_metrics(&self) -> ApiMetrics {
        self.metrics.read().await.clone()
    }

    pub async fn reset_metrics(&self) {
        let mut metrics = self.metrics.write().await;
        *metrics = ApiMetrics::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_metrics_collection() {
        let collector = MetricsCollector::new();

        collector
            .record_request(RequestMetrics {
                endpoint: "/r/rust/hot/.json".to_string(),
                status_code: Some(200),
                response_time: Duration::from_millis(150),
                success: true,
            })
            .await;

        let metrics = collector.get_metrics().await;
        assert_eq!(metrics.total_requests, 1);
        assert_eq!(metrics.successful_requests, 1);
        assert_eq!(metrics.failed_requests, 0);
        assert_eq!(metrics.average_response_time, Duration::from_millis(150));
        assert_eq!(metrics.last_endpoint.as_deref(), Some("/r/rust/hot/.json"));
        assert!(metrics.last_request_time.is_some());
    }

    #[tokio::test]
    async fn test_average_over_mixed_outcomes() {
        let collector = MetricsCollector::new();

        collector
            .record_request(RequestMetrics {
                endpoint: "/r/rust/hot/.json".to_string(),
                status_code: Some(200),
                response_time: Duration::from_millis(100),
                success: true,
            })
            .await;
        collector
            .record_request(RequestMetrics {
                endpoint: "/r/rust/rising/.json".to_string(),
                status_code: Some(503),
                response_time: Duration::from_millis(300),
                success: false,
            })
            .await;

        let metrics = collector.get_metrics().await;
        assert_eq!(metrics.total_requests, 2);
        assert_eq!(metrics.successful_requests, 1);
        assert_eq!(metrics.failed_requests, 1);
        assert_eq!(metrics.average_response_time, Duration::from_millis(200));
        assert_eq!(metrics.last_status_code, Some(503));
    }

    #[tokio::test]
    async fn test_reset_metrics() {
        let collector = MetricsCollector::new();

        collector
            .record_request(RequestMetrics {
                endpoint: "/r/all/hot/.json".to_string(),
                status_code: Some(200),
                response_time: Duration::from_millis(50),
                success: true,
            })
            .await;
        collector.reset_metrics().await;

        let metrics = collector.get_metrics().await;
        assert_eq!(metrics.total_requests, 0);
        assert!(metrics.last_request_time.is_none());
    }
}
