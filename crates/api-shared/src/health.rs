use crate::types::HealthRes;

/// Simple health service shared by the API binaries.
///
/// Reports liveness only; it does not touch dispatch state.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Creates a new instance of HealthService.
    ///
    /// # Returns
    /// A new `HealthService` instance.
    pub fn new() -> Self {
        Self
    }

    /// Health check without creating an instance.
    ///
    /// # Returns
    /// A `HealthRes` reporting that the service is up.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "ResQ is alive".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_health() {
        let res = HealthService::check_health();
        assert!(res.ok);
        assert_eq!(res.message, "ResQ is alive");
    }
}
