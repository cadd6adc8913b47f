//! Property tests for namespace validation and derived names.

use proptest::prelude::*;

use yippie::domain::entities::ResolvedTarget;
use yippie::domain::value_objects::naming::{
    preview_host, production_host, stack_name, STACK_SUFFIX,
};
use yippie::domain::value_objects::{ArchiveKey, DeploymentNamespace, MAX_NAMESPACE_LEN};

fn valid_namespace() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z0-9]([a-z0-9-]{0,30}[a-z0-9])?").unwrap()
}

fn domain() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z]{1,12}\\.(org|com|dev)").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Namespace parsing never panics on arbitrary input.
    #[test]
    fn property_parse_never_panics(s in "(?s).{0,128}") {
        let _ = DeploymentNamespace::parse(&s);
    }

    /// PROPERTY: Every DNS-label-shaped namespace is accepted unchanged.
    #[test]
    fn property_valid_namespace_accepted(raw in valid_namespace()) {
        let ns = DeploymentNamespace::parse(&raw).unwrap();
        prop_assert_eq!(ns.as_str(), raw.as_str());
    }

    /// PROPERTY: Accepted namespaces stay within one DNS label.
    #[test]
    fn property_accepted_namespace_is_label(s in "[a-zA-Z0-9_.-]{0,80}") {
        if let Ok(ns) = DeploymentNamespace::parse(&s) {
            prop_assert!(ns.as_str().len() <= MAX_NAMESPACE_LEN);
            prop_assert!(!ns.as_str().starts_with('-'));
            prop_assert!(!ns.as_str().ends_with('-'));
            prop_assert!(ns.as_str().chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        }
    }

    /// PROPERTY: Derived names depend only on namespace and domain.
    #[test]
    fn property_resolution_is_deterministic(raw in valid_namespace(), domain in domain()) {
        let ns = DeploymentNamespace::parse(&raw).unwrap();
        let first = ResolvedTarget::resolve(&ns, &domain, "eu-central-1");
        let second = ResolvedTarget::resolve(&ns, &domain, "eu-central-1");
        prop_assert_eq!(&first, &second);

        prop_assert_eq!(stack_name(&ns), format!("{}{}", raw, STACK_SUFFIX));
        prop_assert_eq!(production_host(&ns, &domain), format!("{}.{}", raw, domain));
        prop_assert_eq!(preview_host(&ns, &domain), format!("{}-preview.{}", raw, domain));
    }

    /// PROPERTY: Archive keys differ whenever the timestamps differ.
    #[test]
    fn property_archive_keys_track_timestamp(raw in valid_namespace(), a in 0i64..=i64::MAX / 2, b in 0i64..=i64::MAX / 2) {
        let ns = DeploymentNamespace::parse(&raw).unwrap();
        let (ka, kb) = (ArchiveKey::new(&ns, a), ArchiveKey::new(&ns, b));
        prop_assert_eq!(a == b, ka == kb);
        let prefix = format!("{raw}-");
        prop_assert!(ka.as_str().starts_with(&prefix));
        prop_assert!(ka.as_str().ends_with(".zip"));
    }
}
