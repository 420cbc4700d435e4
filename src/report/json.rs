use crate::types::ScoredProfile;

pub fn to_json(profile: &ScoredProfile) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(profile)
}

pub fn batch_to_json(profiles: &[ScoredProfile]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(profiles)
}
