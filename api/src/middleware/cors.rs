//! CORS middleware configuration for cross-origin requests.
//!
//! The portal's web client and the field-worker mobile app both call this
//! API from other origins, so CORS is driven entirely by `CorsConfig`
//! rather than compiled-in origin lists.

use actix_cors::Cors;

use ks_shared::config::CorsConfig;

/// Build a CORS middleware instance from configuration.
///
/// A disabled configuration yields the restrictive default, which rejects
/// cross-origin requests while leaving same-origin traffic untouched. A
/// wildcard entry in the origin list opens the API to any origin; explicit
/// origins are added one by one.
pub fn create_cors(config: &CorsConfig) -> Cors {
    if !config.enabled {
        return Cors::default();
    }

    let wildcard_origin = config.allowed_origins.iter().any(|origin| origin == "*");

    let mut cors = Cors::default().max_age(config.max_age as usize);

    if wildcard_origin {
        cors = cors.allow_any_origin();
    } else {
        for origin in &config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    if config.allowed_methods.iter().any(|method| method == "*") {
        cors = cors.allow_any_method();
    } else {
        cors = cors.allowed_methods(config.allowed_methods.iter().map(String::as_str));
    }

    if config.allowed_headers.iter().any(|header| header == "*") {
        cors = cors.allow_any_header();
    } else {
        cors = cors.allowed_headers(config.allowed_headers.iter().map(String::as_str));
    }

    // actix-cors rejects the credentials + wildcard-origin combination at
    // middleware construction time, so credentials only apply to explicit
    // origin lists.
    if config.allow_credentials && !wildcard_origin {
        cors = cors.supports_credentials();
    }

    cors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_cors_default_config() {
        let _cors = create_cors(&CorsConfig::default());
    }

    #[test]
    fn test_create_cors_development_config() {
        // Development config combines wildcard origins with credentials;
        // the credentials flag must be dropped for the build to be valid.
        let _cors = create_cors(&CorsConfig::development());
    }

    #[test]
    fn test_create_cors_disabled() {
        let config = CorsConfig {
            enabled: false,
            ..CorsConfig::default()
        };
        let _cors = create_cors(&config);
    }

    #[test]
    fn test_create_cors_explicit_origins() {
        let config = CorsConfig {
            enabled: true,
            allowed_origins: vec![
                "https://portal.kaamsetu.in".to_string(),
                "https://app.kaamsetu.in".to_string(),
            ],
            allow_credentials: true,
            ..CorsConfig::default()
        };
        let _cors = create_cors(&config);
    }
}
