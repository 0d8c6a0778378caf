//! Bedrock model ID resolution
//!
//! Applies the region-group inference profile prefix to configured model
//! ids when cross-region inference is enabled.

const PROFILE_PREFIXES: [&str; 7] = ["us", "eu", "ap", "me", "sa", "ca", "af"];

/// Resolve the model id sent to Bedrock.
///
/// - ARNs and ids that already carry a profile prefix pass through.
/// - When `cross_region` is true, other ids are prefixed with the
///   region group (`us-west-2` → `us.`).
pub fn to_bedrock_model_id(model_id: &str, cross_region: bool, region: &str) -> String {
    if !cross_region || model_id.starts_with("arn:") || has_profile_prefix(model_id) {
        return model_id.to_string();
    }

    let prefix = inference_profile_prefix(region);
    format!("{prefix}.{model_id}")
}

fn has_profile_prefix(model_id: &str) -> bool {
    model_id
        .split_once('.')
        .is_some_and(|(head, _)| PROFILE_PREFIXES.contains(&head))
}

/// Derive the inference profile region group from an AWS region string.
///
/// Cross-region inference profiles use continent-level prefixes:
/// `us-east-1` → `us`, `eu-west-1` → `eu`, `ap-northeast-1` → `ap`, etc.
fn inference_profile_prefix(region: &str) -> &str {
    match region.split('-').next() {
        Some(prefix) if PROFILE_PREFIXES.contains(&prefix) => prefix,
        _ => "us", // safe fallback
    }
}
