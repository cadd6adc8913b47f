//! Stack synthesis
//!
//! Turns a CloudFormation template plus the resolved target into a
//! [`StackDescriptor`]. The template is opaque apart from its `Parameters`
//! block, which decides which values get bound.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::config::DeploymentConfig;
use crate::domain::entities::{ResolvedTarget, StackDescriptor, StackParameter};
use crate::domain::value_objects::ArchiveKey;
use crate::error::ConfigError;

/// Template shipped with the binary
pub const EMBEDDED_TEMPLATE: &str = include_str!("../../templates/static-site.json");

const EMBEDDED_ORIGIN: &str = "embedded static-site.json";

/// A template parameter and whether CloudFormation can fall back to a default
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredParameter {
    pub name: String,
    pub has_default: bool,
}

/// Parsed template body
#[derive(Debug, Clone)]
pub struct StackTemplate {
    origin: String,
    body: String,
    parameters: Vec<DeclaredParameter>,
}

impl StackTemplate {
    /// Embedded template, or the file at `path`
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            None => Self::parse(EMBEDDED_ORIGIN, EMBEDDED_TEMPLATE.to_string()),
            Some(path) => {
                let body = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::parse(&path.display().to_string(), body)
            }
        }
    }

    pub fn parse(origin: &str, body: String) -> Result<Self, ConfigError> {
        let invalid = |message: String| ConfigError::Template {
            origin: origin.to_string(),
            message,
        };

        let root: Value = serde_json::from_str(&body).map_err(|e| invalid(e.to_string()))?;
        let root = root
            .as_object()
            .ok_or_else(|| invalid("template must be a JSON object".to_string()))?;

        let parameters = match root.get("Parameters") {
            None => Vec::new(),
            Some(Value::Object(map)) => map
                .iter()
                .map(|(name, spec)| DeclaredParameter {
                    name: name.clone(),
                    has_default: spec.get("Default").is_some(),
                })
                .collect(),
            Some(_) => return Err(invalid("'Parameters' must be an object".to_string())),
        };

        Ok(Self {
            origin: origin.to_string(),
            body,
            parameters,
        })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn parameters(&self) -> &[DeclaredParameter] {
        &self.parameters
    }
}

/// Parameters the coordinator always supplies
const ALWAYS_BOUND: &[&str] = &[
    "Namespace",
    "DomainName",
    "CertificateArn",
    "HostedZoneId",
    "ProductionHost",
    "PreviewHost",
    "ArtifactBucket",
    "ArtifactKey",
];

const CONTENT_DEPLOYER: &str = "ContentDeployerArn";

impl StackTemplate {
    /// Fail when a declared parameter without a `Default` cannot be bound
    /// from `config`. Depends only on configuration, so it runs before the
    /// archive is built.
    pub fn check_bindable(&self, config: &DeploymentConfig) -> Result<(), ConfigError> {
        let unbound: Vec<&str> = self
            .parameters
            .iter()
            .filter(|p| !p.has_default && !can_bind(&p.name, config))
            .map(|p| p.name.as_str())
            .collect();

        if unbound.is_empty() {
            return Ok(());
        }
        Err(ConfigError::Template {
            origin: self.origin.clone(),
            message: format!(
                "no value for parameter(s) without a default: {}",
                unbound.join(", ")
            ),
        })
    }
}

fn can_bind(name: &str, config: &DeploymentConfig) -> bool {
    match name {
        CONTENT_DEPLOYER => config.content_deployer_arn.is_some(),
        other => ALWAYS_BOUND.contains(&other),
    }
}

/// Values the coordinator knows how to supply, by parameter name
fn known_values(
    config: &DeploymentConfig,
    target: &ResolvedTarget,
    artifact_key: &ArchiveKey,
) -> Vec<(&'static str, Option<String>)> {
    vec![
        ("Namespace", Some(target.namespace.clone())),
        ("DomainName", Some(config.domain_name.clone())),
        ("CertificateArn", Some(config.certificate_arn.clone())),
        ("HostedZoneId", Some(config.hosted_zone_id.clone())),
        ("ProductionHost", Some(target.production_host.clone())),
        ("PreviewHost", Some(target.preview_host.clone())),
        ("ArtifactBucket", Some(config.artifact_bucket.clone())),
        ("ArtifactKey", Some(artifact_key.to_string())),
        (CONTENT_DEPLOYER, config.content_deployer_arn.clone()),
    ]
}

/// Bind declared parameters and assemble the descriptor.
///
/// Parameters with no known value are left to their template `Default`;
/// [`StackTemplate::check_bindable`] has already rejected the rest.
pub fn synthesize(
    template: &StackTemplate,
    config: &DeploymentConfig,
    target: ResolvedTarget,
    artifact_key: ArchiveKey,
) -> StackDescriptor {
    let known = known_values(config, &target, &artifact_key);

    let parameters: Vec<StackParameter> = template
        .parameters
        .iter()
        .filter_map(|declared| {
            known
                .iter()
                .find(|(name, _)| *name == declared.name)
                .and_then(|(_, value)| value.clone())
                .map(|value| StackParameter::new(&declared.name, value))
        })
        .collect();

    tracing::debug!(
        template = %template.origin,
        parameters = parameters.len(),
        "stack synthesized"
    );

    StackDescriptor {
        target,
        artifact_key,
        template_body: template.body.clone(),
        parameters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::DeploymentNamespace;
    use std::path::PathBuf;
    use std::time::Duration;

    fn config() -> DeploymentConfig {
        DeploymentConfig {
            namespace: DeploymentNamespace::parse("demo").unwrap(),
            domain_name: "example.org".to_string(),
            certificate_arn: "arn:aws:acm:us-east-1:123456789012:certificate/abc".to_string(),
            hosted_zone_id: "Z0123456789ABC".to_string(),
            region: "eu-central-1".to_string(),
            account: "123456789012".to_string(),
            artifact_bucket: "artifacts".to_string(),
            source_folder: PathBuf::from("site"),
            fast_update: true,
            content_deployer_arn: None,
            template: None,
            poll_interval: Duration::from_millis(10),
        }
    }

    fn target(config: &DeploymentConfig) -> ResolvedTarget {
        ResolvedTarget::resolve(&config.namespace, &config.domain_name, &config.region)
    }

    fn key(config: &DeploymentConfig) -> ArchiveKey {
        ArchiveKey::new(&config.namespace, 1_700_000_000_000)
    }

    #[test]
    fn embedded_template_declares_known_parameters() {
        let template = StackTemplate::load(None).unwrap();
        let names: Vec<&str> = template
            .parameters()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        for expected in [
            "Namespace",
            "DomainName",
            "CertificateArn",
            "HostedZoneId",
            "ProductionHost",
            "PreviewHost",
            "ArtifactBucket",
            "ArtifactKey",
            "ContentDeployerArn",
        ] {
            assert!(names.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn embedded_template_binds_everything_but_optional_deployer() {
        let config = config();
        let template = StackTemplate::load(None).unwrap();
        let descriptor = synthesize(&template, &config, target(&config), key(&config));

        assert_eq!(descriptor.stack_name(), "demo-StackStatic");
        assert_eq!(descriptor.parameter("ProductionHost"), Some("demo.example.org"));
        assert_eq!(
            descriptor.parameter("PreviewHost"),
            Some("demo-preview.example.org")
        );
        assert_eq!(
            descriptor.parameter("ArtifactKey"),
            Some("demo-1700000000000.zip")
        );
        assert_eq!(descriptor.parameter("ContentDeployerArn"), None);
        assert_eq!(descriptor.parameters.len(), 8);
    }

    #[test]
    fn content_deployer_is_bound_when_configured() {
        let mut config = config();
        config.content_deployer_arn =
            Some("arn:aws:lambda:eu-central-1:123456789012:function:unzip".to_string());
        let template = StackTemplate::load(None).unwrap();
        let descriptor = synthesize(&template, &config, target(&config), key(&config));
        assert_eq!(
            descriptor.parameter("ContentDeployerArn"),
            Some("arn:aws:lambda:eu-central-1:123456789012:function:unzip")
        );
    }

    #[test]
    fn only_declared_parameters_are_bound() {
        let config = config();
        let template = StackTemplate::parse(
            "inline",
            r#"{"Parameters": {"Namespace": {"Type": "String"}}, "Resources": {}}"#.to_string(),
        )
        .unwrap();
        let descriptor = synthesize(&template, &config, target(&config), key(&config));
        assert_eq!(
            descriptor.parameters,
            vec![StackParameter::new("Namespace", "demo")]
        );
    }

    #[test]
    fn unknown_parameter_without_default_fails() {
        let config = config();
        let template = StackTemplate::parse(
            "inline",
            r#"{"Parameters": {"Namespace": {"Type": "String"}, "Color": {"Type": "String"}}}"#
                .to_string(),
        )
        .unwrap();
        let err = template.check_bindable(&config).unwrap_err();
        assert!(err.to_string().contains("Color"), "{err}");
        assert!(!err.to_string().contains("Namespace"), "{err}");
    }

    #[test]
    fn unknown_parameter_with_default_is_left_alone() {
        let config = config();
        let template = StackTemplate::parse(
            "inline",
            r#"{"Parameters": {"Color": {"Type": "String", "Default": "blue"}}}"#.to_string(),
        )
        .unwrap();
        template.check_bindable(&config).unwrap();
        let descriptor = synthesize(&template, &config, target(&config), key(&config));
        assert!(descriptor.parameters.is_empty());
    }

    #[test]
    fn required_content_deployer_needs_configured_arn() {
        let mut config = config();
        let template = StackTemplate::parse(
            "inline",
            r#"{"Parameters": {"ContentDeployerArn": {"Type": "String"}}}"#.to_string(),
        )
        .unwrap();
        let err = template.check_bindable(&config).unwrap_err();
        assert!(err.to_string().contains("ContentDeployerArn"), "{err}");

        config.content_deployer_arn = Some("arn:aws:lambda:eu-central-1:1:function:f".to_string());
        template.check_bindable(&config).unwrap();
    }

    #[test]
    fn embedded_template_is_bindable_without_deployer() {
        StackTemplate::load(None).unwrap().check_bindable(&config()).unwrap();
    }

    #[test]
    fn malformed_template_is_config_error() {
        let err = StackTemplate::parse("inline", "{not json".to_string()).unwrap_err();
        assert!(matches!(err, ConfigError::Template { .. }));

        let err = StackTemplate::parse("inline", "[1, 2]".to_string()).unwrap_err();
        assert!(err.to_string().contains("JSON object"), "{err}");
    }

    #[test]
    fn template_file_is_read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        fs::write(&path, r#"{"Resources": {}}"#).unwrap();

        let template = StackTemplate::load(Some(&path)).unwrap();
        assert!(template.parameters().is_empty());
        assert!(template.origin().ends_with("custom.json"));

        let err = StackTemplate::load(Some(&dir.path().join("missing.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
