    use super::*;

    #[test]
    fn test_validate_default_config() {
        let config = Config::default();
        let result = ConfigValidator::validate(&config).unwrap();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.path == "chain.endpoint"));
    }

    #[test]
    fn test_validate_invalid_port() {
        let mut config = Config::default();
        config.server.port = 0;

        let result = ConfigValidator::validate(&config).unwrap();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.path == "server.port"));
    }

    #[test]
    fn test_validate_zero_workers() {
        let mut config = Config::default();
        config.registration.max_workers = 0;

        let result = ConfigValidator::validate(&config).unwrap();
        assert!(result.errors.iter().any(|e| e.path == "registration.max_workers"));
    }

    #[test]
    fn test_validate_zero_retries_and_batch() {
        let mut config = Config::default();
        config.registration.max_retries = 0;
        config.chain.batch_size = 0;

        let result = ConfigValidator::validate(&config).unwrap();
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn test_validate_high_workers_warning() {
        let mut config = Config::default();
        config.registration.max_workers = 32;

        let result = ConfigValidator::validate(&config).unwrap();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.path == "registration.max_workers"));
    }

    #[test]
    fn test_validate_bad_endpoint() {
        let mut config = Config::default();
        config.chain.endpoint = Some("ftp://example.com".to_string());
        config.notification.endpoint = Some("example.com/notify".to_string());

        let result = ConfigValidator::validate(&config).unwrap();
        assert!(result.errors.iter().any(|e| e.path == "chain.endpoint"));
        assert!(result.errors.iter().any(|e| e.path == "notification.endpoint"));
    }

    #[test]
    fn test_validate_watch_template_without_id() {
        let mut config = Config::default();
        config.site.watch_url_template = "{base}/watch/".to_string();

        let result = ConfigValidator::validate(&config).unwrap();
        assert!(result.errors.iter().any(|e| e.path == "site.watch_url_template"));
    }

    #[test]
    fn test_into_result_reports_first_error() {
        let mut config = Config::default();
        config.server.host = String::new();

        let result = ConfigValidator::validate(&config).unwrap();
        match result.into_result() {
            Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "server.host"),
            other => panic!("unexpected {:?}", other.map(|w| w.len())),
        }
    }

    #[test]
    fn test_into_result_keeps_warnings() {
        let config = Config::default();
        let warnings = ConfigValidator::validate(&config).unwrap().into_result().unwrap();
        assert!(!warnings.is_empty());
    }
