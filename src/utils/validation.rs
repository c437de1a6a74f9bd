use crate::utils::error::{AdapterError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AdapterError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value
        .as_ref()
        .ok_or_else(|| AdapterError::MissingConfigError {
            field: field_name.to_string(),
        })
}

/// API Gateway 的 stage/base path 只能是路徑片段
pub fn validate_base_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Ok(());
    }

    if let Some(c) = path
        .chars()
        .find(|c| c.is_whitespace() || *c == '?' || *c == '#' || c.is_control())
    {
        return Err(AdapterError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: format!("Base path cannot contain {:?}", c),
        });
    }

    Ok(())
}

pub fn validate_header_names(field_name: &str, names: &[String]) -> Result<()> {
    for name in names {
        if axum::http::HeaderName::from_bytes(name.as_bytes()).is_err() {
            return Err(AdapterError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: name.clone(),
                reason: "Not a valid HTTP header name".to_string(),
            });
        }
    }
    Ok(())
}

pub fn validate_mime_fragments(field_name: &str, fragments: &[String]) -> Result<()> {
    if fragments.is_empty() {
        return Err(AdapterError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: String::new(),
            reason: "At least one text MIME type is required".to_string(),
        });
    }

    for fragment in fragments {
        validate_non_empty_string(field_name, fragment)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_base_path() {
        assert!(validate_base_path("api_gateway_base_path", "/").is_ok());
        assert!(validate_base_path("api_gateway_base_path", "").is_ok());
        assert!(validate_base_path("api_gateway_base_path", "prod").is_ok());
        assert!(validate_base_path("api_gateway_base_path", "/v1/api").is_ok());
        assert!(validate_base_path("api_gateway_base_path", "/v1 api").is_err());
        assert!(validate_base_path("api_gateway_base_path", "/v1?x=1").is_err());
        assert!(validate_base_path("api_gateway_base_path", "/v1#top").is_err());
    }

    #[test]
    fn test_validate_header_names() {
        let names = vec!["x-request-id".to_string(), "Set-Cookie".to_string()];
        assert!(validate_header_names("exclude_headers", &names).is_ok());

        let invalid = vec!["bad header".to_string()];
        assert!(validate_header_names("exclude_headers", &invalid).is_err());
    }

    #[test]
    fn test_validate_mime_fragments() {
        assert!(validate_mime_fragments("text_mime_types", &["text/".to_string()]).is_ok());
        assert!(validate_mime_fragments("text_mime_types", &[]).is_err());
        assert!(validate_mime_fragments("text_mime_types", &[" ".to_string()]).is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("value".to_string());
        assert_eq!(
            validate_required_field("field", &present).unwrap(),
            "value"
        );

        let missing: Option<String> = None;
        assert!(matches!(
            validate_required_field("field", &missing),
            Err(AdapterError::MissingConfigError { .. })
        ));
    }
}
