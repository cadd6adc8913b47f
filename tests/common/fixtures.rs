//! Reusable configuration.

/// Every required key, as environment variables
pub const VALID_ENV: &[(&str, &str)] = &[
    ("NAMESPACE", "demo"),
    ("DOMAINNAME", "example.org"),
    (
        "AWS_CERTIFICATEARN",
        "arn:aws:acm:us-east-1:123456789012:certificate/abc",
    ),
    ("AWS_HOSTEDZONEID", "Z0123456789ABC"),
    ("AWS_REGION", "eu-central-1"),
    ("AWS_ACCOUNT", "123456789012"),
    ("AWS_ARTIFACTBUCKET", "yippiecloud-artifacts"),
];

/// `VALID_ENV` with one key replaced
pub fn env_with<'a>(key: &'a str, value: &'a str) -> Vec<(&'a str, &'a str)> {
    VALID_ENV
        .iter()
        .map(|&(k, v)| if k == key { (k, value) } else { (k, v) })
        .collect()
}

/// `VALID_ENV` without one key
pub fn env_without(key: &str) -> Vec<(&'static str, &'static str)> {
    VALID_ENV.iter().copied().filter(|&(k, _)| k != key).collect()
}
